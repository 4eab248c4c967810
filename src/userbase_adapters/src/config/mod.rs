pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    AllowedOrigins, DatabaseSettings, HealthSettings, IdentitySettings, MongoSettings,
    PostgresSettings, ServerSettings, ServiceSettings, StoreBackend,
};
