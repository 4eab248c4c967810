pub mod health;
pub mod login;
pub mod oauth_callback;
pub mod registration;

// Re-export for convenience
pub use health::HealthReporter;
pub use login::LoginUseCase;
pub use oauth_callback::{OAuthCallbackError, OAuthCallbackUseCase};
pub use registration::RegistrationService;
