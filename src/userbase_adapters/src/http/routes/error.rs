use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use userbase_application::OAuthCallbackError;
use userbase_core::{IdentityError, UserError, UserStoreError};

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Identity provider is not configured")]
    IdentityDisabled,

    #[error("Identity provider unavailable")]
    IdentityUnavailable,

    #[error("Unexpected error")]
    UnexpectedError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::UserAlreadyExists => StatusCode::CONFLICT,
            ApiError::IdentityDisabled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::IdentityUnavailable => StatusCode::BAD_GATEWAY,
            ApiError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Store and provider details stay in the logs
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status_code, body).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        ApiError::InvalidInput(error.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<UserStoreError> for ApiError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::UserAlreadyExists => ApiError::UserAlreadyExists,
            UserStoreError::UserNotFound => ApiError::UserNotFound,
            UserStoreError::InvalidUserId(e) => ApiError::InvalidInput(e.to_string()),
            UserStoreError::UnexpectedError(e) => ApiError::UnexpectedError(e),
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::Disabled => ApiError::IdentityDisabled,
            IdentityError::Unavailable(_) => ApiError::IdentityUnavailable,
        }
    }
}

impl From<OAuthCallbackError> for ApiError {
    fn from(error: OAuthCallbackError) -> Self {
        match error {
            OAuthCallbackError::IdentityError(e) => e.into(),
        }
    }
}
