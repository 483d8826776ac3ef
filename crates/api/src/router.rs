use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{auth_handlers, middleware as auth_middleware, user_handlers, AppState};

pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(|| async { "idkit API running" }))
        .route("/auth/signup", post(auth_handlers::signup))
        .route("/auth/login", post(auth_handlers::login));

    // Every user route needs a valid token; ownership is checked per mutation
    let user_routes = Router::new()
        .route("/users", get(user_handlers::list_users))
        .route(
            "/users/{id}",
            get(user_handlers::get_user)
                .patch(user_handlers::update_user)
                .delete(user_handlers::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
