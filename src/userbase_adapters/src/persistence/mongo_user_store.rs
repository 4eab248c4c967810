use futures::TryStreamExt;
use mongodb::{
    Client, Collection, IndexModel,
    bson::{doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
};
use serde::{Deserialize, Serialize};
use userbase_core::{
    Email, IdFormat, NewUser, ObjectKey, StoreConnection, User, UserId, UserStore, UserStoreError,
};

const USERS_COLLECTION: &str = "users";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// User store over the `users` collection.
///
/// Object ids are generated here, client side, before the insert. A unique
/// index on `email` backs the one-user-per-email rule.
#[derive(Clone)]
pub struct MongoUserStore {
    client: Client,
    users: Collection<UserDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bio: Option<String>,
}

impl From<UserDocument> for User {
    fn from(document: UserDocument) -> Self {
        let id = UserId::Object(ObjectKey::from_bytes(document.id.bytes()));
        User::from_stored(id, document.name, document.email, document.bio)
    }
}

impl MongoUserStore {
    pub fn new(client: Client, database_name: &str) -> Self {
        let users = client.database(database_name).collection(USERS_COLLECTION);
        Self { client, users }
    }

    /// Create the unique `email` index. Safe to call on every start.
    #[tracing::instrument(name = "Ensuring MongoDB indexes", skip_all)]
    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.users.create_index(unique_email).await?;
        Ok(())
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait::async_trait]
impl UserStore for MongoUserStore {
    fn id_format(&self) -> IdFormat {
        IdFormat::ObjectId
    }

    #[tracing::instrument(name = "Retrieving user by email from MongoDB", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let document = self
            .users
            .find_one(doc! { "email": email.as_str() })
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        let Some(document) = document else {
            return Err(UserStoreError::UserNotFound);
        };

        Ok(document.into())
    }

    #[tracing::instrument(name = "Adding user to MongoDB", skip_all)]
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError> {
        let id = ObjectId::new();
        let document = UserDocument {
            id,
            name: user.name().as_str().to_string(),
            email: user.email().as_str().to_string(),
            bio: None,
        };

        self.users.insert_one(&document).await.map_err(|e| {
            if is_duplicate_key(&e) {
                return UserStoreError::UserAlreadyExists;
            }
            UserStoreError::UnexpectedError(e.to_string())
        })?;

        Ok(User::from_new(
            UserId::Object(ObjectKey::from_bytes(id.bytes())),
            user,
        ))
    }

    #[tracing::instrument(name = "Retrieving user by id from MongoDB", skip_all)]
    async fn find_by_id(&self, id: &UserId) -> Result<User, UserStoreError> {
        let UserId::Object(key) = id else {
            return Err(UserStoreError::UserNotFound);
        };

        let document = self
            .users
            .find_one(doc! { "_id": ObjectId::from_bytes(key.bytes()) })
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        let Some(document) = document else {
            return Err(UserStoreError::UserNotFound);
        };

        Ok(document.into())
    }

    #[tracing::instrument(name = "Listing users from MongoDB", skip_all)]
    async fn list_all(&self) -> Result<Vec<User>, UserStoreError> {
        let documents: Vec<UserDocument> = self
            .users
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        Ok(documents.into_iter().map(User::from).collect())
    }
}

#[async_trait::async_trait]
impl StoreConnection for MongoUserStore {
    async fn ping(&self) -> Result<(), String> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn close(&self) {
        tracing::info!("Disconnected from MongoDB");
        self.client.clone().shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_written_under_older_rules_still_map() {
        let id = ObjectId::new();
        let document = UserDocument {
            id,
            name: "N".repeat(150),
            email: "Legacy@Example.com".to_string(),
            bio: Some("Imported".to_string()),
        };

        let user = User::from(document);

        assert_eq!(user.id(), &UserId::Object(ObjectKey::from_bytes(id.bytes())));
        assert_eq!(user.name().as_str().chars().count(), 150);
        assert_eq!(user.email().as_str(), "Legacy@Example.com");
        assert_eq!(user.bio(), Some("Imported"));
    }
}
