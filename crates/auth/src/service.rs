use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::{AuthError, Result},
    jwt::{SessionToken, TokenService},
    model::{NewUser, Profile, UserView},
    password::PasswordHasher,
    store::UserStore,
    validator::CredentialValidator,
};

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: SessionToken,
    pub user: UserView,
}

/// Signup and login on top of a [`UserStore`]
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    validator: CredentialValidator,
    tokens: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    ///
    /// # Arguments
    /// * `store` - Where user records live
    /// * `hasher` - Password hasher with the configured work factor
    /// * `tokens` - Token issuer holding the signing secret
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        let validator = CredentialValidator::new(Arc::clone(&store), hasher.clone());
        Self {
            store,
            hasher,
            validator,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new user
    ///
    /// # Arguments
    /// * `email` - User's email address
    /// * `password` - User's plain text password (will be hashed)
    /// * `profile` - Profile fields stored alongside the credential
    pub async fn signup(&self, email: &str, password: &str, profile: Profile) -> Result<UserView> {
        if password.is_empty() {
            return Err(AuthError::InvalidInput("password must not be empty".to_string()));
        }

        let hasher = self.hasher.clone();
        let plaintext = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AuthError::HashingError(e.to_string()))??;

        let user = self
            .store
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                profile,
            })
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "signup rejected by user store"))?;

        tracing::info!(user_id = %user.id, "user signed up");
        Ok(UserView::from(user))
    }

    /// Login a user and return a session token
    ///
    /// # Arguments
    /// * `email` - User's email address
    /// * `password` - User's plain text password
    /// * `now` - Issuance time of the token
    pub async fn login(&self, email: &str, password: &str, now: DateTime<Utc>) -> Result<LoginResponse> {
        let Some(user) = self.validator.validate(email, password).await? else {
            tracing::debug!("login rejected");
            return Err(AuthError::Unauthorized);
        };

        let access_token = self.tokens.issue(&user.identity(), now)?;

        tracing::info!(user_id = %user.id, "user logged in");
        Ok(LoginResponse { access_token, user })
    }
}
