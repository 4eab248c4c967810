use mongodb::Client;
use secrecy::ExposeSecret;
use sqlx::{PgPool, migrate::MigrateError, postgres::PgPoolOptions};
use thiserror::Error;
use userbase_adapters::{
    config::{MongoSettings, PostgresSettings},
    persistence::{MongoUserStore, PostgresUserStore},
};

#[derive(Debug, Error)]
pub enum StoreSetupError {
    #[error("PostgreSQL connection failed: {0}")]
    Postgres(#[from] sqlx::Error),
    #[error("PostgreSQL migration failed: {0}")]
    Migration(#[from] MigrateError),
    #[error("MongoDB setup failed: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// Connect to PostgreSQL and bring the schema up to date.
///
/// # Returns
/// A store over a pool of at most `max_connections` connections
pub async fn configure_postgresql(
    settings: &PostgresSettings,
) -> Result<PostgresUserStore, StoreSetupError> {
    let pool = get_postgres_pool(settings.url.expose_secret(), settings.max_connections).await?;
    tracing::info!("Connected to PostgreSQL");

    let store = PostgresUserStore::new(pool);
    store.migrate().await?;

    Ok(store)
}

/// Connect to MongoDB and make sure the unique email index exists.
pub async fn configure_mongodb(settings: &MongoSettings) -> Result<MongoUserStore, StoreSetupError> {
    let client = get_mongo_client(settings.uri.expose_secret()).await?;

    let store = MongoUserStore::new(client, &settings.database_name);
    store.ensure_indexes().await?;
    tracing::info!(database = %settings.database_name, "Connected to MongoDB");

    Ok(store)
}

/// Create a PostgreSQL connection pool
///
/// # Arguments
/// * `url` - Database connection URL
/// * `max_connections` - Upper bound on pooled connections
pub async fn get_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

/// Create a MongoDB client. Connections are made lazily on first use.
pub async fn get_mongo_client(uri: &str) -> Result<Client, mongodb::error::Error> {
    Client::with_uri_str(uri).await
}
