//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{
    middleware::SESSION_COOKIE,
    page::INDEX_HTML,
    protocol::{
        DocumentText, DocumentView, HealthResponse, ParametersView, SessionView,
        SummarizeRequest, SummaryOptions, SummaryView,
    },
    state::{ActiveSession, AppState},
};
use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
    Extension,
};
use bytes::Bytes;
use std::sync::Arc;
use summarizer_core::{
    domain::{SummaryParameters, SummaryStyle, UploadedDocument},
    extract::{detect_media_type, ExtractError},
    ports::PortError,
    session::SessionError,
};
use tracing::{error, info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        summary_options_handler,
        create_session_handler,
        get_session_handler,
        end_session_handler,
        upload_document_handler,
        full_document_handler,
        summarize_handler,
    ),
    components(
        schemas(
            SessionView, DocumentView, DocumentText, ParametersView, SummaryView,
            SummarizeRequest, SummaryOptions, HealthResponse
        )
    ),
    tags(
        (name = "Document Summarizer API", description = "Upload a .txt or .pdf document and summarize it with a language model.")
    )
)]
pub struct ApiDoc;

type HandlerError = (StatusCode, String);

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Turns a session failure into a status code and a message the user can act on.
pub fn session_error_response(e: SessionError) -> HandlerError {
    match &e {
        SessionError::Extract(ExtractError::UnsupportedFormat(_)) => {
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
        }
        SessionError::Extract(ExtractError::Parse(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        SessionError::Prompt(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        SessionError::NoDocument => (StatusCode::CONFLICT, e.to_string()),
        SessionError::Port(PortError::Authentication(detail)) => {
            error!("Model provider rejected the credential: {}", detail);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "The summarization service rejected its credentials. Please contact the operator."
                    .to_string(),
            )
        }
        SessionError::Port(port_error) => {
            warn!("Summarization failed: {}", port_error);
            (
                StatusCode::BAD_GATEWAY,
                format!("{}. Your document and settings are kept; try again.", port_error),
            )
        }
    }
}

fn session_cookie(session_id: Uuid) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/",
        SESSION_COOKIE, session_id
    )
}

//=========================================================================================
// Public Handlers
//=========================================================================================

/// Serves the single-page summarizer UI.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler(State(app_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: app_state.config.summary_model.clone(),
    })
}

/// The styles and sentence-count range the UI should offer.
#[utoipa::path(
    get,
    path = "/summary-options",
    responses((status = 200, description = "Available summary options", body = SummaryOptions))
)]
pub async fn summary_options_handler() -> Json<SummaryOptions> {
    Json(SummaryOptions::default())
}

/// Start a new session.
///
/// Sets the session cookie used by every `/session` endpoint.
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created", body = SessionView)
    )
)]
pub async fn create_session_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let active = app_state.sessions.create().await;
    let view = SessionView::new(active.id, &*active.handle.lock().await);

    (
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(active.id))],
        Json(view),
    )
}

//=========================================================================================
// Session Handlers (behind `require_session`)
//=========================================================================================

/// Current state of the caller's session.
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Session state", body = SessionView),
        (status = 401, description = "No live session")
    )
)]
pub async fn get_session_handler(Extension(active): Extension<ActiveSession>) -> Json<SessionView> {
    let session = active.handle.lock().await;
    Json(SessionView::new(active.id, &session))
}

/// End the caller's session and discard its document.
#[utoipa::path(
    delete,
    path = "/session",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "No live session")
    )
)]
pub async fn end_session_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(active): Extension<ActiveSession>,
) -> impl IntoResponse {
    app_state.sessions.remove(active.id).await;
    let cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE);
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

/// Upload a document, replacing the current one.
///
/// Accepts a multipart/form-data request with a `file` part holding a .txt or .pdf file.
/// A failed upload leaves the previously loaded document in place.
#[utoipa::path(
    post,
    path = "/session/document",
    request_body(content_type = "multipart/form-data", description = "The document to upload."),
    responses(
        (status = 200, description = "Document loaded", body = DocumentView),
        (status = 400, description = "Missing file part"),
        (status = 401, description = "No live session"),
        (status = 415, description = "Not a .txt or .pdf document"),
        (status = 422, description = "Document could not be parsed")
    )
)]
pub async fn upload_document_handler(
    Extension(active): Extension<ActiveSession>,
    mut multipart: Multipart,
) -> Result<Json<DocumentView>, HandlerError> {
    let upload = read_upload(&mut multipart).await?;
    info!(
        "Session {} uploaded {:?} ({} bytes)",
        active.id,
        upload.file_name,
        upload.bytes.len()
    );

    let mut session = active.handle.lock().await;
    let loaded = session
        .load_document(upload)
        .map_err(session_error_response)?;
    Ok(Json(DocumentView::from(loaded)))
}

/// Pulls the `file` part out of the form and resolves its declared type.
async fn read_upload(multipart: &mut Multipart) -> Result<UploadedDocument, HandlerError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            e.status(),
            format!("Failed to read multipart data: {}", e.body_text()),
        )
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let media_type = detect_media_type(field.content_type(), file_name.as_deref())
            .map_err(|e| session_error_response(e.into()))?;
        let data: Bytes = field.bytes().await.map_err(|e| {
            (
                e.status(),
                format!("Failed to read file bytes: {}", e.body_text()),
            )
        })?;

        let mut upload = UploadedDocument::new(media_type, data);
        upload.file_name = file_name;
        return Ok(upload);
    }

    Err((
        StatusCode::BAD_REQUEST,
        "Multipart form must include a file".to_string(),
    ))
}

/// The full extracted text of the current document.
#[utoipa::path(
    get,
    path = "/session/document",
    responses(
        (status = 200, description = "Full document text", body = DocumentText),
        (status = 401, description = "No live session"),
        (status = 409, description = "No document loaded")
    )
)]
pub async fn full_document_handler(
    Extension(active): Extension<ActiveSession>,
) -> Result<Json<DocumentText>, HandlerError> {
    let session = active.handle.lock().await;
    let document = session
        .document()
        .ok_or_else(|| session_error_response(SessionError::NoDocument))?;

    Ok(Json(DocumentText {
        file_name: document.file_name.clone(),
        text: document.text.as_str().to_string(),
    }))
}

/// Summarize the current document.
///
/// Blocks until the model answers or fails. Failures leave the document, the
/// entered parameters and any earlier summary untouched.
#[utoipa::path(
    post,
    path = "/session/summary",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Summary generated", body = SummaryView),
        (status = 400, description = "Invalid sentence count or style"),
        (status = 401, description = "No live session"),
        (status = 409, description = "No document loaded"),
        (status = 502, description = "Model provider failed or returned nothing"),
        (status = 503, description = "Model provider rejected the credential")
    )
)]
pub async fn summarize_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(active): Extension<ActiveSession>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummaryView>, HandlerError> {
    let style = request
        .style
        .parse::<SummaryStyle>()
        .map_err(|e| session_error_response(e.into()))?;
    let parameters = SummaryParameters {
        sentence_count: request.sentence_count,
        style,
        instructions: request.instructions,
    };

    let mut session = active.handle.lock().await;
    let summary = session
        .summarize(app_state.summarizer.as_ref(), parameters)
        .await
        .map_err(session_error_response)?;

    info!("Session {} received a summary", active.id);
    Ok(Json(SummaryView::from(summary)))
}
