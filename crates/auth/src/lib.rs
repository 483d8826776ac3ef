// Core modules
mod error;
mod password;
mod jwt;
mod validator;

// Store-integrated modules
pub mod guard;
pub mod model;
pub mod service;
pub mod store;
pub mod users;

#[cfg(test)]
mod testing;

// Re-export error types
pub use error::{AuthError, Result, UNAUTHORIZED_MESSAGE};

// Re-export crypto primitives
pub use password::{HashParams, PasswordHasher, MAX_PASSWORD_BYTES};
pub use jwt::{Claims, SessionToken, TokenService};
pub use validator::CredentialValidator;

// Re-export store-integrated types
pub use guard::AuthorizationGuard;
pub use model::{Identity, NewUser, Profile, User, UserChanges, UserView};
pub use service::{AuthService, LoginResponse};
pub use store::{InMemoryUserStore, StoreError, UserStore};
pub use users::UserService;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AuthError, Result,
        AuthService, AuthorizationGuard, UserService,
        Identity, User, UserView, Profile, UserChanges,
        SessionToken, TokenService, PasswordHasher,
    };
}
