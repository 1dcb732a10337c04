//! Authentication middleware: the authorization gate.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Authorization gate middleware.
///
/// Extracts the bearer token, verifies it, reloads the user and
/// re-checks active/blocked state (both may have changed since the
/// token was issued), then injects the resulting Identity into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let identity = state.auth_service.authenticate(token).await?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
