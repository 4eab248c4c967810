use userbase_core::{Email, NewUser, User, UserName, UserStore, UserStoreError};

/// Registration service - registers users and reads them back.
///
/// The lookup before `create` is only a fast path. Two concurrent
/// registrations for one email can both pass it; the store's uniqueness
/// constraint then turns the loser into `UserAlreadyExists`.
#[derive(Clone)]
pub struct RegistrationService<U>
where
    U: UserStore,
{
    user_store: U,
}

impl<U> RegistrationService<U>
where
    U: UserStore,
{
    pub fn new(user_store: U) -> Self {
        Self { user_store }
    }

    /// Register a new user
    ///
    /// # Arguments
    /// * `name` - Validated display name
    /// * `email` - Normalized email, the uniqueness key
    ///
    /// # Returns
    /// The created user, `UserAlreadyExists` if the email is taken, or
    /// `UnexpectedError` if the store failed. A failed lookup aborts the
    /// registration before anything is written.
    #[tracing::instrument(name = "RegistrationService::register", skip_all)]
    pub async fn register(&self, name: UserName, email: Email) -> Result<User, UserStoreError> {
        match self.user_store.find_by_email(&email).await {
            Ok(_) => return Err(UserStoreError::UserAlreadyExists),
            Err(UserStoreError::UserNotFound) => {}
            Err(e) => {
                tracing::error!(operation = "find_by_email", error = %e, "Registration aborted");
                return Err(store_failure(e));
            }
        }

        self.user_store
            .create(NewUser::new(name, email))
            .await
            .inspect_err(|e| {
                if matches!(e, UserStoreError::UnexpectedError(_)) {
                    tracing::error!(operation = "create", error = %e, "Registration failed");
                }
            })
    }

    /// Look a user up by a raw identifier, validated against the store's
    /// id format first.
    #[tracing::instrument(name = "RegistrationService::get_by_id", skip(self))]
    pub async fn get_by_id(&self, raw_id: &str) -> Result<User, UserStoreError> {
        let id = self.user_store.id_format().parse(raw_id)?;

        self.user_store.find_by_id(&id).await.inspect_err(|e| {
            if matches!(e, UserStoreError::UnexpectedError(_)) {
                tracing::error!(operation = "find_by_id", error = %e, "User lookup failed");
            }
        })
    }

    #[tracing::instrument(name = "RegistrationService::list_all", skip_all)]
    pub async fn list_all(&self) -> Result<Vec<User>, UserStoreError> {
        self.user_store.list_all().await.inspect_err(|e| {
            tracing::error!(operation = "list_all", error = %e, "Listing users failed");
        })
    }
}

fn store_failure(error: UserStoreError) -> UserStoreError {
    match error {
        UserStoreError::UnexpectedError(_) => error,
        other => UserStoreError::UnexpectedError(other.to_string()),
    }
}
