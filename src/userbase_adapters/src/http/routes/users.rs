use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use userbase_application::RegistrationService;
use userbase_core::{Email, User, UserId, UserName, UserStore};

use super::error::ApiError;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
}

#[derive(Serialize, Debug)]
pub struct RegisterResponse {
    pub message: String,
    pub id: UserId,
}

#[tracing::instrument(name = "Register user", skip_all)]
pub async fn register_user<U>(
    State(registration): State<RegistrationService<U>>,
    request: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    U: UserStore + Clone + 'static,
{
    let Json(request) = request?;

    let name = UserName::parse(&request.name)?;
    let email = Email::parse(&request.email)?;

    let user = registration.register(name, email).await?;

    let response = RegisterResponse {
        message: String::from("User registered successfully"),
        id: *user.id(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

#[tracing::instrument(name = "Get user", skip(registration))]
pub async fn get_user<U>(
    State(registration): State<RegistrationService<U>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError>
where
    U: UserStore + Clone + 'static,
{
    let user = registration.get_by_id(&id).await?;
    Ok(Json(user))
}

#[tracing::instrument(name = "List users", skip_all)]
pub async fn list_users<U>(
    State(registration): State<RegistrationService<U>>,
) -> Result<Json<Vec<User>>, ApiError>
where
    U: UserStore + Clone + 'static,
{
    let users = registration.list_all().await?;
    Ok(Json(users))
}
