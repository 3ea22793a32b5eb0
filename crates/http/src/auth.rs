//! Bearer-token guard for `/api` routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Method},
    middleware::Next,
    response::Response,
};
use posters_auth::{bearer_token, JwtVerifier};

use crate::error::AppError;

/// Rejects requests without a valid bearer token and stores the verified
/// [`posters_auth::Claims`] in the request extensions. Preflight `OPTIONS`
/// requests pass through.
pub async fn require_bearer(
    State(verifier): State<Arc<JwtVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = bearer_token(header)?;

    let claims = verifier.verify(token)?;
    tracing::debug!(sub = ?claims.sub, "bearer token accepted");

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
