use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::rest::error::ApiError;
use crate::rest::AppState;

/// Rejects resource requests whose bearer token differs from the configured
/// one. Without a configured token every request passes.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.api_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(ApiError::unauthorized)?;

    if token != expected {
        tracing::warn!(path = %request.uri().path(), "rejected request with invalid token");
        return Err(ApiError::unauthorized());
    }

    Ok(next.run(request).await)
}
