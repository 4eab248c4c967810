use std::time::Duration;

use axum::http::HeaderValue;
use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

use super::constants::{
    CONFIG_FILE,
    env::{DATABASE_URL_ENV_VAR, ENV_PREFIX, ENV_SEPARATOR, MONGODB_URI_ENV_VAR},
    prod,
};

/// Settings for the whole service.
///
/// Loaded from `config/base.*` (optional) and then `USERBASE__*`
/// environment variables, e.g. `USERBASE__DATABASE__BACKEND=mongo`.
/// `DATABASE_URL` and `MONGODB_URI` override the connection strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub identity: IdentitySettings,
    pub health: HealthSettings,
}

impl ServiceSettings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .set_override_option(
                "database.postgres.url",
                std::env::var(DATABASE_URL_ENV_VAR).ok(),
            )?
            .set_override_option(
                "database.mongo.uri",
                std::env::var(MONGODB_URI_ENV_VAR).ok(),
            )?
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub request_timeout_ms: u64,
    pub allowed_origins: AllowedOrigins,
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: prod::APP_ADDRESS.to_string(),
            request_timeout_ms: prod::REQUEST_TIMEOUT_MS,
            allowed_origins: AllowedOrigins::default(),
        }
    }
}

/// Which store implementation the process runs with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub backend: StoreBackend,
    pub postgres: PostgresSettings,
    pub mongo: MongoSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresSettings {
    pub url: Secret<String>,
    pub max_connections: u32,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            url: Secret::new(prod::postgres::URL.to_string()),
            max_connections: prod::postgres::MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoSettings {
    pub uri: Secret<String>,
    pub database_name: String,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            uri: Secret::new(prod::mongo::URI.to_string()),
            database_name: prod::mongo::DATABASE_NAME.to_string(),
        }
    }
}

/// Where the external identity provider lives. No `base_url` means
/// identity routes answer 503.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    pub base_url: Option<String>,
    pub timeout_ms: u64,
}

impl IdentitySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: prod::identity::TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthSettings {
    pub timeout_ms: u64,
}

impl HealthSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            timeout_ms: prod::health::TIMEOUT_MS,
        }
    }
}

/// Origins allowed to call the API cross-site. Entries that are not valid
/// header values are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.contains(origin)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for AllowedOrigins {
    fn from(origins: Vec<String>) -> Self {
        Self(
            origins
                .iter()
                .map(|origin| origin.trim())
                .filter(|origin| !origin.is_empty())
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect(),
        )
    }
}
