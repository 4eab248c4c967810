pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    email::Email,
    health::{HealthReport, HealthStatus},
    identity::{ClientContext, Credentials, IdentitySession, OAuthCallback},
    user::{NewUser, User, UserError},
    user_id::{IdFormat, ObjectKey, UserId, UserIdError},
    user_name::UserName,
};

pub use ports::{
    identity::{IdentityError, IdentityProvider, IdentityStorer},
    repositories::{StoreConnection, UserStore, UserStoreError},
};
