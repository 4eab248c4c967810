use async_trait::async_trait;
use thiserror::Error;

use crate::{
    domain::{
        email::Email,
        identity::{ClientContext, Credentials, IdentitySession, OAuthCallback},
        user::{NewUser, User},
        user_name::UserName,
    },
    ports::repositories::{UserStore, UserStoreError},
};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity provider is not configured")]
    Disabled,
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// The external identity provider.
///
/// Sessions, password checks and the OAuth2 exchange all happen on the other
/// side of this trait. A non-2xx answer from the provider is still an `Ok`
/// session; errors are reserved for not reaching it at all.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(
        &self,
        credentials: Credentials,
        client: ClientContext,
    ) -> Result<IdentitySession, IdentityError>;

    async fn complete_oauth(
        &self,
        callback: OAuthCallback,
        client: ClientContext,
    ) -> Result<IdentitySession, IdentityError>;
}

/// Hooks the identity provider is configured with to reach user profiles.
///
/// Every [`UserStore`] satisfies this through the blanket impl below, so the
/// provider only ever needs an email keyed lookup and save.
///
/// Remember-me tokens and session state are kept by the provider itself;
/// no token hooks are exposed here.
#[async_trait]
pub trait IdentityStorer: Send + Sync {
    async fn load(&self, email: &Email) -> Result<User, UserStoreError>;

    async fn create_account(&self, user: NewUser) -> Result<User, UserStoreError>;

    /// Make sure an OAuth2 identity has a profile, creating an `Unknown`
    /// named one on first sight.
    async fn save_oauth2(&self, email: Email) -> Result<User, UserStoreError> {
        match self.load(&email).await {
            Err(UserStoreError::UserNotFound) => {
                let new_user = NewUser::new(UserName::unknown(), email.clone());
                match self.create_account(new_user).await {
                    // Lost a race against a concurrent first login.
                    Err(UserStoreError::UserAlreadyExists) => self.load(&email).await,
                    created => created,
                }
            }
            loaded => loaded,
        }
    }
}

#[async_trait]
impl<U> IdentityStorer for U
where
    U: UserStore,
{
    async fn load(&self, email: &Email) -> Result<User, UserStoreError> {
        self.find_by_email(email).await
    }

    async fn create_account(&self, user: NewUser) -> Result<User, UserStoreError> {
        self.create(user).await
    }
}
