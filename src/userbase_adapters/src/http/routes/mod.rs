pub mod auth;
pub mod error;
pub mod health;
pub mod users;

pub use auth::{IdentityState, LoginRequest, OAuthCallbackRequest, login, oauth_callback};
pub use error::{ApiError, ErrorResponse};
pub use health::{HealthResponse, health};
pub use users::{RegisterRequest, RegisterResponse, get_user, list_users, register_user};
