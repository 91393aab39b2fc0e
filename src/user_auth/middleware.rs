use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::gateway::state::AppState;

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Verify the bearer token and inject the caller's `Identity` for handlers.
///
/// Missing header, wrong scheme, bad signature and expiry all produce the same
/// `Unauthenticated` response.
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            tracing::warn!(path = %request.uri().path(), "missing or malformed bearer header");
            AppError::Unauthenticated
        })?;

    let identity = state.auth.verify_token(token)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
