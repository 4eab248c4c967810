pub mod helpers;
pub mod tracing;
mod user_service;

pub use user_service::{UserService, shutdown_signal};
