use sqlx::{Connection, PgPool, migrate::MigrateError};
use userbase_core::{
    Email, IdFormat, NewUser, StoreConnection, User, UserId, UserStore, UserStoreError,
};

/// User store over the `users` table.
///
/// Ids come from the table's `BIGSERIAL` sequence and the `UNIQUE (email)`
/// constraint is what actually keeps emails unique.
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresUserStore { pool }
    }

    /// Apply pending schema migrations.
    #[tracing::instrument(name = "Running PostgreSQL migrations", skip_all)]
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    bio: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_stored(UserId::Sequence(row.id), row.name, row.email, row.bio)
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    fn id_format(&self) -> IdFormat {
        IdFormat::Sequence
    }

    #[tracing::instrument(name = "Retrieving user by email from PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT id, name, email, bio
                FROM users
                WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        let Some(row) = row else {
            return Err(UserStoreError::UserNotFound);
        };

        Ok(row.into())
    }

    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                INSERT INTO users (name, email)
                VALUES ($1, $2)
                RETURNING id, name, email, bio
            "#,
        )
        .bind(user.name().as_str())
        .bind(user.email().as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return UserStoreError::UserAlreadyExists;
                }
            }
            UserStoreError::UnexpectedError(e.to_string())
        })?;

        Ok(row.into())
    }

    #[tracing::instrument(name = "Retrieving user by id from PostgreSQL", skip_all)]
    async fn find_by_id(&self, id: &UserId) -> Result<User, UserStoreError> {
        let UserId::Sequence(id) = *id else {
            return Err(UserStoreError::UserNotFound);
        };

        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT id, name, email, bio
                FROM users
                WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        let Some(row) = row else {
            return Err(UserStoreError::UserNotFound);
        };

        Ok(row.into())
    }

    #[tracing::instrument(name = "Listing users from PostgreSQL", skip_all)]
    async fn list_all(&self) -> Result<Vec<User>, UserStoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT id, name, email, bio
                FROM users
                ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[async_trait::async_trait]
impl StoreConnection for PostgresUserStore {
    async fn ping(&self) -> Result<(), String> {
        let mut conn = self.pool.acquire().await.map_err(|e| e.to_string())?;
        conn.ping().await.map_err(|e| e.to_string())
    }

    async fn close(&self) {
        tracing::info!("Disconnected from PostgreSQL");
        self.pool.close().await;
    }
}
