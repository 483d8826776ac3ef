use thiserror::Error;

use crate::store::StoreError;

/// Message shared by every authentication failure. Callers must not be able to
/// tell a wrong password from an unknown email or an expired token.
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid credentials";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    #[error("You are not allowed to modify this resource")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("User not found")]
    NotFound,

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Token generation failed: {0}")]
    TokenGenerationError(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => AuthError::Conflict(msg),
            StoreError::Unavailable(msg) => AuthError::Storage(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
