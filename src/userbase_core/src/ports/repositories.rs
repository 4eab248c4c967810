use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    email::Email,
    user::{NewUser, User},
    user_id::{IdFormat, UserId, UserIdError},
};

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid user id: {0}")]
    InvalidUserId(#[from] UserIdError),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserAlreadyExists, Self::UserAlreadyExists) => true,
            (Self::UserNotFound, Self::UserNotFound) => true,
            (Self::InvalidUserId(_), Self::InvalidUserId(_)) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// Persistence for the `users` collection.
///
/// `create` is the only mutating operation. Implementations must back the
/// at-most-one-user-per-email rule with a storage level uniqueness
/// constraint and report a violation as `UserAlreadyExists`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Format of the identifiers this store issues.
    fn id_format(&self) -> IdFormat;

    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError>;
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError>;
    async fn find_by_id(&self, id: &UserId) -> Result<User, UserStoreError>;
    async fn list_all(&self) -> Result<Vec<User>, UserStoreError>;
}

/// The backend connection behind a store, owned by the composition root.
#[async_trait]
pub trait StoreConnection: Send + Sync {
    /// Round-trip to the backend. Callers bound this with their own timeout.
    async fn ping(&self) -> Result<(), String>;

    async fn close(&self);
}
