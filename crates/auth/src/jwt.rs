use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, Result};
use crate::model::Identity;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    pub email: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(identity: &Identity, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: identity.subject_id,
            email: identity.email.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Expired once more than `ttl` has passed since issuance
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.timestamp() - self.iat > ttl.num_seconds()
    }

    pub fn identity(&self) -> Identity {
        Identity {
            subject_id: self.sub,
            email: self.email.clone(),
        }
    }
}

/// Compact, signed bearer token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Issues and verifies HS256 session tokens.
///
/// Holds only the signing keys and the TTL, so it is cheap to clone and
/// `verify` can run concurrently on every request without locking.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// # Arguments
    /// * `secret` - The secret key for signing tokens
    /// * `ttl_seconds` - Validity window from issuance (e.g., 3600 for 1 hour)
    pub fn new(secret: &str, ttl_seconds: i64) -> Result<Self> {
        if secret.is_empty() {
            return Err(AuthError::InvalidInput("signing secret must not be empty".to_string()));
        }
        if ttl_seconds <= 0 {
            return Err(AuthError::InvalidInput("token ttl must be positive".to_string()));
        }

        // Expiry is checked against the caller's clock in `verify`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "iat"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_seconds),
            validation,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `identity`, valid from `now` for the configured TTL
    pub fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<SessionToken> {
        let claims = Claims::new(identity, now, self.ttl);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(SessionToken)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Verify signature and expiry and return the carried identity.
    ///
    /// Every failure collapses to [`AuthError::Unauthorized`].
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected session token");
                AuthError::Unauthorized
            })?
            .claims;

        if claims.is_expired_at(now, self.ttl) {
            tracing::debug!(subject = %claims.sub, "rejected expired session token");
            return Err(AuthError::Unauthorized);
        }

        Ok(claims.identity())
    }
}
