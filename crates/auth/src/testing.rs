use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{NewUser, User, UserChanges};
use crate::store::{StoreError, StoreResult, UserStore};

/// Store whose every call fails as if the backend were down
pub struct FailingStore;

#[async_trait]
impl UserStore for FailingStore {
    async fn create(&self, _new_user: NewUser) -> StoreResult<User> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn find_by_email(&self, _email: &str) -> StoreResult<Option<User>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn find_by_id(&self, _id: Uuid) -> StoreResult<Option<User>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn find_all(&self) -> StoreResult<Vec<User>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn update(&self, _id: Uuid, _changes: UserChanges) -> StoreResult<Option<User>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _id: Uuid) -> StoreResult<Option<User>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Wraps a store and counts mutating calls
pub struct CountingStore<S = crate::store::InMemoryUserStore> {
    inner: S,
    updates: AtomicUsize,
    deletes: AtomicUsize,
}

impl<S: UserStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            updates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: UserStore> UserStore for CountingStore<S> {
    async fn create(&self, new_user: NewUser) -> StoreResult<User> {
        self.inner.create(new_user).await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> StoreResult<Vec<User>> {
        self.inner.find_all().await
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }
}
