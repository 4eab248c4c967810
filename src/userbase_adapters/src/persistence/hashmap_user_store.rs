use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use userbase_core::{
    Email, IdFormat, NewUser, StoreConnection, User, UserId, UserStore, UserStoreError,
};

#[derive(Default)]
struct Users {
    by_email: HashMap<Email, User>,
    last_id: i64,
}

/// In-memory user store, ids come from a counter starting at 1.
#[derive(Default, Clone)]
pub struct HashMapUserStore {
    users: Arc<RwLock<Users>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for HashMapUserStore {
    fn id_format(&self) -> IdFormat {
        IdFormat::Sequence
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users
            .by_email
            .get(email)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn create(&self, user: NewUser) -> Result<User, UserStoreError> {
        let mut users = self.users.write().await;
        if users.by_email.contains_key(user.email()) {
            return Err(UserStoreError::UserAlreadyExists);
        }

        users.last_id += 1;
        let created = User::from_new(UserId::Sequence(users.last_id), user);
        users
            .by_email
            .insert(created.email().clone(), created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users
            .by_email
            .values()
            .find(|user| user.id() == id)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserStoreError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.by_email.values().cloned().collect();
        all.sort_by_key(|user| *user.id());
        Ok(all)
    }
}

#[async_trait::async_trait]
impl StoreConnection for HashMapUserStore {
    async fn ping(&self) -> Result<(), String> {
        Ok(())
    }

    async fn close(&self) {}
}
