use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{ApiError, AppState};
use auth::{AuthError, Identity};

/// Middleware to require authentication.
///
/// Verifies the bearer token and stores the resulting [`Identity`] in the
/// request extensions for handlers to pick up with [`AuthIdentity`].
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let identity = state.guard.authenticate_bearer(header, Utc::now())?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Extractor for the authenticated identity
/// Use this in handlers that are protected by `require_auth`
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub Identity);

impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthIdentity)
            .ok_or(ApiError(AuthError::Unauthorized))
    }
}
