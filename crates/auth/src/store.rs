use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{NewUser, User, UserChanges};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),

    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence for user records.
///
/// Lookups return `Ok(None)` for a missing user; `Err` is reserved for the
/// store itself failing.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create(&self, new_user: NewUser) -> StoreResult<User>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_all(&self) -> StoreResult<Vec<User>>;

    async fn update(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>>;

    async fn delete(&self, id: Uuid) -> StoreResult<Option<User>>;
}

/// Process-local user store
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, new_user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                new_user.email
            )));
        }

        let user = User::new(new_user);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        Ok(all)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.apply(changes);
            user.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Profile;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            profile: Profile {
                name: "Ciclano".to_string(),
                birth_date: None,
            },
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryUserStore::new();
        let created = store.create(new_user("ciclano@email.com")).await.unwrap();

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        let by_email = store.find_by_email("ciclano@email.com").await.unwrap().unwrap();

        assert_eq!(by_id.id, created.id);
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryUserStore::new();
        store.create(new_user("dup@email.com")).await.unwrap();

        let result = store.create(new_user("dup@email.com")).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let store = InMemoryUserStore::new();
        store.create(new_user("Case@email.com")).await.unwrap();

        assert!(store.find_by_email("case@email.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_user() {
        let store = InMemoryUserStore::new();
        let missing = Uuid::new_v4();

        assert!(store.update(missing, UserChanges::default()).await.unwrap().is_none());
        assert!(store.delete(missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_user() {
        let store = InMemoryUserStore::new();
        let created = store.create(new_user("gone@email.com")).await.unwrap();

        let deleted = store.delete(created.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, created.id);
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
