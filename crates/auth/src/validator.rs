use std::sync::Arc;

use crate::{
    error::{AuthError, Result},
    model::UserView,
    password::PasswordHasher,
    store::UserStore,
};

// Verified against when the email is unknown, so both paths cost one Argon2 run.
const DUMMY_PASSWORD: &str = "idkit-unknown-account";

/// Checks an email/password pair against the stored credential
#[derive(Clone)]
pub struct CredentialValidator {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    dummy_hash: Option<Arc<str>>,
}

impl CredentialValidator {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        let dummy_hash = hasher
            .hash(DUMMY_PASSWORD)
            .inspect_err(|e| tracing::warn!(error = %e, "could not prepare dummy password hash"))
            .ok()
            .map(Arc::from);

        Self {
            store,
            hasher,
            dummy_hash,
        }
    }

    async fn verify_blocking(&self, password: &str, password_hash: String) -> Result<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    /// Returns the user when the password matches.
    ///
    /// An unknown email and a wrong password both give `Ok(None)`. Store
    /// failures are returned as errors, never folded into `None`.
    pub async fn validate(&self, email: &str, password: &str) -> Result<Option<UserView>> {
        let Some(user) = self.store.find_by_email(email).await? else {
            if let Some(dummy_hash) = &self.dummy_hash {
                self.verify_blocking(password, dummy_hash.to_string()).await?;
            }
            return Ok(None);
        };

        let matches = self.verify_blocking(password, user.password_hash.clone()).await?;

        Ok(matches.then(|| UserView::from(user)))
    }
}
