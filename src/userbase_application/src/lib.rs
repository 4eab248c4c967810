pub mod use_cases;

pub use use_cases::{
    HealthReporter, LoginUseCase, OAuthCallbackError, OAuthCallbackUseCase, RegistrationService,
};
