pub mod middleware;
pub mod page;
pub mod protocol;
pub mod rest;
pub mod state;


pub use middleware::require_session;
pub use rest::{
    create_session_handler, end_session_handler, full_document_handler, get_session_handler,
    health_handler, index_handler, summarize_handler, summary_options_handler,
    upload_document_handler,
};

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use state::AppState;
use tower_http::trace::TraceLayer;

/// Builds the application router. CORS and Swagger UI are layered on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/summary-options", get(summary_options_handler))
        .route("/sessions", post(create_session_handler));

    // Session routes (a live session cookie is required)
    let session_routes = Router::new()
        .route("/session", get(get_session_handler).delete(end_session_handler))
        .route(
            "/session/document",
            get(full_document_handler).post(upload_document_handler),
        )
        .route("/session/summary", post(summarize_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .layer(DefaultBodyLimit::max(app_state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
