use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;
use uuid::{Uuid, Version};

use crate::{middleware::AuthIdentity, ApiError, AppState};
use auth::{AuthError, UserChanges, UserView};

/// Path ids must be v4 UUIDs; anything else is a client error
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .ok()
        .filter(|id| id.get_version() == Some(Version::Random))
        .ok_or_else(|| ApiError(AuthError::InvalidInput(format!("invalid user id: {raw}"))))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthIdentity(identity): AuthIdentity,
) -> Result<Json<Vec<UserView>>, ApiError> {
    let users = state.user_service.find_all(&identity).await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    AuthIdentity(identity): AuthIdentity,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.user_service.find_one(&identity, id).await?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthIdentity(identity): AuthIdentity,
    Path(id): Path<String>,
    changes: Result<Json<UserChanges>, JsonRejection>,
) -> Result<Json<UserView>, ApiError> {
    let id = parse_id(&id)?;
    // Ownership is decided before the body is looked at.
    state.guard.authorize_ownership(&identity, id)?;
    let Json(changes) = changes?;
    let user = state.user_service.update(&identity, id, changes).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthIdentity(identity): AuthIdentity,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.user_service.remove(&identity, id).await?;
    Ok(Json(user))
}
