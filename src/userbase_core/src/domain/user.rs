use serde::Serialize;
use thiserror::Error;

use super::{email::Email, user_id::UserId, user_name::UserName};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
}

/// A registration that has not been persisted yet.
///
/// The bio is always unset at this point; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: UserName,
    email: Email,
}

impl NewUser {
    pub fn new(name: UserName, email: Email) -> Self {
        Self { name, email }
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }
}

/// A persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    name: UserName,
    email: Email,
    bio: Option<String>,
}

impl User {
    /// Materialize a freshly created user from its registration and the id
    /// the store assigned to it.
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        Self {
            id,
            name: new_user.name,
            email: new_user.email,
            bio: None,
        }
    }

    /// Rebuild a user from stored fields.
    ///
    /// Rows are not re-validated: one record written under older rules
    /// must not make every listing fail.
    pub fn from_stored(id: UserId, name: String, email: String, bio: Option<String>) -> Self {
        Self {
            id,
            name: UserName::from_stored(name),
            email: Email::from_stored(email),
            bio,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }
}
