//! # Userbase - User Registration Service Library
//!
//! Facade crate that re-exports the public APIs of the userbase components.
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `UserName`, `User`, `UserId`, etc.
//! - **Ports**: `UserStore`, `StoreConnection`, `IdentityProvider`, `IdentityStorer`
//! - **Use cases**: `RegistrationService`, `HealthReporter`, `LoginUseCase`, `OAuthCallbackUseCase`
//! - **Adapters**: `PostgresUserStore`, `MongoUserStore`, `HashMapUserStore`, `HttpIdentityProvider`
//! - **Service**: `UserService` - the router and standalone server

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use userbase_core::*;
}

pub use userbase_core::{
    Email, HealthReport, HealthStatus, IdFormat, NewUser, User, UserError, UserId, UserName,
};

// ============================================================================
// Ports
// ============================================================================

/// Store and identity trait definitions
pub mod ports {
    pub use userbase_core::{
        IdentityError, IdentityProvider, IdentityStorer, StoreConnection, UserStore,
        UserStoreError,
    };
}

pub use ports::{
    IdentityError, IdentityProvider, IdentityStorer, StoreConnection, UserStore, UserStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use userbase_application::*;
}

pub use userbase_application::{
    HealthReporter, LoginUseCase, OAuthCallbackUseCase, RegistrationService,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP route handlers
    pub mod http {
        pub use userbase_adapters::http::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use userbase_adapters::persistence::*;
    }

    /// Identity provider clients
    pub mod identity {
        pub use userbase_adapters::identity::*;
    }

    /// Configuration
    pub mod config {
        pub use userbase_adapters::config::*;
    }
}

pub use userbase_adapters::{
    identity::{ConfiguredIdentityProvider, DisabledIdentityProvider, HttpIdentityProvider},
    persistence::{HashMapUserStore, MongoUserStore, PostgresUserStore},
};

// ============================================================================
// User Service (Main Entry Point)
// ============================================================================

pub use userbase_service::{
    UserService,
    helpers::{StoreSetupError, configure_mongodb, configure_postgresql},
    shutdown_signal,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing store traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
