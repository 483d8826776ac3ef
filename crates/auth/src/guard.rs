use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::{AuthError, Result},
    jwt::TokenService,
    model::Identity,
};

const BEARER_SCHEME: &str = "Bearer";

/// Request-level authentication and ownership checks.
///
/// A protected operation first calls [`AuthorizationGuard::authenticate`]
/// (or [`AuthorizationGuard::authenticate_bearer`] with the raw
/// `Authorization` header) to turn a token into an [`Identity`]. Mutating
/// operations then call [`AuthorizationGuard::authorize_ownership`] before
/// touching the store. Either failure ends the request.
#[derive(Debug, Clone)]
pub struct AuthorizationGuard {
    tokens: TokenService,
}

impl AuthorizationGuard {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }

    pub fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<Identity> {
        self.tokens.verify(token, now)
    }

    /// Authenticate from an `Authorization: Bearer <token>` header value.
    /// The scheme name is matched case-insensitively.
    pub fn authenticate_bearer(&self, header: Option<&str>, now: DateTime<Utc>) -> Result<Identity> {
        let token = header
            .and_then(|v| v.split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(BEARER_SCHEME))
            .map(|(_, token)| token.trim())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                tracing::debug!("missing or malformed Authorization header");
                AuthError::Unauthorized
            })?;

        self.authenticate(token, now)
    }

    /// Allow only when the acting identity owns the resource
    pub fn authorize_ownership(&self, acting: &Identity, owner_id: Uuid) -> Result<()> {
        if acting.subject_id == owner_id {
            Ok(())
        } else {
            tracing::warn!(
                acting = %acting.subject_id,
                owner = %owner_id,
                "ownership check failed"
            );
            Err(AuthError::Forbidden)
        }
    }
}
