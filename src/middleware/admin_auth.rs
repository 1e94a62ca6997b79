use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::AppState;

/// Middleware that validates the `Authorization: Bearer <password>` header
/// against the configured admin password.
///
/// - If no admin password is configured, returns 404 (hides the endpoint
///   entirely).
/// - If the password is missing or wrong, returns 401.
pub async fn require_admin_password(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let expected = match &state.admin_password {
        Some(p) => p.clone(),
        None => {
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let provided = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(password) if password == expected => next.run(req).await,
        _ => {
            tracing::warn!(uri = %req.uri().path(), "Admin middleware: rejected credential");
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}
