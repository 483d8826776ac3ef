use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AuthError, Result},
    guard::AuthorizationGuard,
    model::{Identity, UserChanges, UserView},
    store::UserStore,
};

/// User CRUD for authenticated callers.
///
/// Reads are open to any authenticated identity. Updates and deletes are
/// limited to the owner and are rejected before the store is called.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    guard: AuthorizationGuard,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, guard: AuthorizationGuard) -> Self {
        Self { store, guard }
    }

    pub async fn find_all(&self, _acting: &Identity) -> Result<Vec<UserView>> {
        let users = self.store.find_all().await?;
        Ok(users.into_iter().map(UserView::from).collect())
    }

    pub async fn find_one(&self, _acting: &Identity, id: Uuid) -> Result<UserView> {
        self.store
            .find_by_id(id)
            .await?
            .map(UserView::from)
            .ok_or(AuthError::NotFound)
    }

    pub async fn update(&self, acting: &Identity, id: Uuid, changes: UserChanges) -> Result<UserView> {
        self.guard.authorize_ownership(acting, id)?;

        let user = self.store.update(id, changes).await?.ok_or(AuthError::NotFound)?;
        tracing::info!(user_id = %user.id, "user updated");
        Ok(UserView::from(user))
    }

    pub async fn remove(&self, acting: &Identity, id: Uuid) -> Result<UserView> {
        self.guard.authorize_ownership(acting, id)?;

        let user = self.store.delete(id).await?.ok_or(AuthError::NotFound)?;
        tracing::info!(user_id = %user.id, "user removed");
        Ok(UserView::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::TokenService;
    use crate::model::{NewUser, Profile};
    use crate::store::InMemoryUserStore;
    use crate::testing::CountingStore;

    struct Fixture {
        store: Arc<CountingStore>,
        users: UserService,
        alice: Identity,
        bob: Identity,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(CountingStore::new(InMemoryUserStore::new()));
        let mut identities = Vec::new();
        for (email, name) in [("a@x.com", "A"), ("b@x.com", "B")] {
            let user = store
                .create(NewUser {
                    email: email.to_string(),
                    password_hash: "hash".to_string(),
                    profile: Profile {
                        name: name.to_string(),
                        birth_date: None,
                    },
                })
                .await
                .unwrap();
            identities.push(user.identity());
        }
        let bob = identities.pop().unwrap();
        let alice = identities.pop().unwrap();

        let guard = AuthorizationGuard::new(TokenService::new("secret", 60).unwrap());
        Fixture {
            users: UserService::new(store.clone(), guard),
            store,
            alice,
            bob,
        }
    }

    fn rename(name: &str) -> UserChanges {
        UserChanges {
            name: Some(name.to_string()),
            birth_date: None,
        }
    }

    #[tokio::test]
    async fn test_owner_can_update() {
        let f = fixture().await;

        let updated = f.users.update(&f.alice, f.alice.subject_id, rename("B")).await.unwrap();

        assert_eq!(updated.name, "B");
        assert_eq!(f.store.update_calls(), 1);
    }

    #[tokio::test]
    async fn test_non_owner_update_never_reaches_store() {
        let f = fixture().await;

        let result = f.users.update(&f.bob, f.alice.subject_id, rename("Hacked")).await;

        assert!(matches!(result, Err(AuthError::Forbidden)));
        assert_eq!(f.store.update_calls(), 0);
        let alice = f.users.find_one(&f.bob, f.alice.subject_id).await.unwrap();
        assert_eq!(alice.name, "A");
    }

    #[tokio::test]
    async fn test_non_owner_remove_never_reaches_store() {
        let f = fixture().await;

        let result = f.users.remove(&f.bob, f.alice.subject_id).await;

        assert!(matches!(result, Err(AuthError::Forbidden)));
        assert_eq!(f.store.delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_owner_can_remove() {
        let f = fixture().await;

        f.users.remove(&f.alice, f.alice.subject_id).await.unwrap();

        let result = f.users.find_one(&f.bob, f.alice.subject_id).await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn test_reads_are_not_ownership_gated() {
        let f = fixture().await;

        let all = f.users.find_all(&f.bob).await.unwrap();
        assert_eq!(all.len(), 2);

        let alice = f.users.find_one(&f.bob, f.alice.subject_id).await.unwrap();
        assert_eq!(alice.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_update_deleted_owner_is_not_found() {
        let f = fixture().await;
        f.users.remove(&f.alice, f.alice.subject_id).await.unwrap();

        let result = f.users.update(&f.alice, f.alice.subject_id, rename("Ghost")).await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }
}
