use auth::{AuthService, AuthorizationGuard, UserService};

/// Application state shared across all handlers
pub struct AppState {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub guard: AuthorizationGuard,
}

impl AppState {
    pub fn new(auth_service: AuthService, user_service: UserService, guard: AuthorizationGuard) -> Self {
        Self {
            auth_service,
            user_service,
            guard,
        }
    }
}
