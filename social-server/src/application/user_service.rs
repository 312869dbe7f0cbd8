use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::error::{GetMeError, GetUserError, ListUsersError};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::user::{User, UserSummary};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[instrument(skip(self))]
    pub async fn get_me(&self, user_id: Uuid) -> Result<User, GetMeError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(GetMeError::UserNotFound)
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self, page: PageRequest) -> Result<Page<User>, ListUsersError> {
        Ok(self.users.list(page).await?)
    }

    /// Public lookup; no caller existence check and a reduced projection.
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Uuid) -> Result<UserSummary, GetUserError> {
        self.users
            .find_summary(user_id)
            .await?
            .ok_or(GetUserError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;

    #[tokio::test]
    async fn get_me_returns_full_profile() {
        let store = Arc::new(InMemoryStore::new());
        let alice = store.insert_user("Alice", "alice");
        let service = UserService::new(store);

        let me = service.get_me(alice.id).await.unwrap();
        assert_eq!(me.email, "alice@example.com");
        assert_eq!(me.username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn unknown_users_are_reported() {
        let service = UserService::new(Arc::new(InMemoryStore::new()));

        assert!(matches!(
            service.get_me(Uuid::new_v4()).await,
            Err(GetMeError::UserNotFound)
        ));
        assert!(matches!(
            service.get_user(Uuid::new_v4()).await,
            Err(GetUserError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn lists_users_by_name() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_user("Carol", "carol");
        store.insert_user("Alice", "alice");
        store.insert_user("Bob", "bob");
        let service = UserService::new(store);

        let page = service
            .list_users(PageRequest::new(Some(1), Some(2)))
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob"]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(2), 2);
    }
}
