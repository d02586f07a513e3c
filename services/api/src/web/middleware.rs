//! services/api/src/web/middleware.rs
//!
//! Session middleware for the routes that act on the caller's session.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::web::state::AppState;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "summary_session";

/// Reads the session id from the request's cookie header, if present and well formed.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header
        .split(';')
        .find_map(|c| c.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
}

/// Middleware that resolves the session cookie to a live session.
///
/// If valid, inserts the `ActiveSession` into request extensions for handlers to use.
/// If missing, malformed or expired, returns 401 Unauthorized.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let session_id = session_id_from_headers(req.headers()).ok_or((
        StatusCode::UNAUTHORIZED,
        "No session found. Start a new session first.".to_string(),
    ))?;

    let active = state.sessions.get(session_id).await.ok_or_else(|| {
        warn!("Request for unknown or expired session {}", session_id);
        (
            StatusCode::UNAUTHORIZED,
            "Session expired. Start a new session.".to_string(),
        )
    })?;

    req.extensions_mut().insert(active);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_id_is_read_from_cookie() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, id)).unwrap(),
        );

        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_malformed_or_missing_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id_from_headers(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("summary_session=not-a-uuid"),
        );
        assert_eq!(session_id_from_headers(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("summary_session_old=4c1c5a8e-0000-0000-0000-000000000000"),
        );
        assert_eq!(session_id_from_headers(&headers), None);
    }
}
