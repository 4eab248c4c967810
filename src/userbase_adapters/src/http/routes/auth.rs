use axum::{
    Json,
    body::Body,
    extract::{Path, State, rejection::JsonRejection},
    http::{
        HeaderMap, HeaderName, HeaderValue, StatusCode,
        header::{CONTENT_TYPE, COOKIE},
    },
    response::{IntoResponse, Response},
};
use secrecy::Secret;
use serde::Deserialize;
use userbase_application::{LoginUseCase, OAuthCallbackUseCase};
use userbase_core::{
    ClientContext, Credentials, Email, IdentityProvider, IdentitySession, IdentityStorer,
    OAuthCallback,
};

use super::error::ApiError;

/// What the identity routes need: the provider, and the store it saves
/// OAuth2 profiles into.
#[derive(Clone)]
pub struct IdentityState<P, S> {
    pub provider: P,
    pub storer: S,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: Secret<String>,
}

#[derive(Deserialize)]
pub struct OAuthCallbackRequest {
    pub code: String,
    pub state: Option<String>,
}

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<P, S>(
    State(state): State<IdentityState<P, S>>,
    headers: HeaderMap,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError>
where
    P: IdentityProvider + Clone + 'static,
    S: IdentityStorer + Clone + 'static,
{
    let Json(request) = request?;

    let credentials = Credentials {
        email: Email::parse(&request.email)?,
        password: request.password,
    };

    let session = LoginUseCase::new(state.provider)
        .execute(credentials, client_context(&headers))
        .await?;

    Ok(session_response(session))
}

#[tracing::instrument(name = "OAuth2 callback", skip(state, headers, request))]
pub async fn oauth_callback<P, S>(
    State(state): State<IdentityState<P, S>>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    request: Result<Json<OAuthCallbackRequest>, JsonRejection>,
) -> Result<Response, ApiError>
where
    P: IdentityProvider + Clone + 'static,
    S: IdentityStorer + Clone + 'static,
{
    let Json(request) = request?;

    if !is_valid_provider_name(&provider) {
        return Err(ApiError::InvalidInput(format!(
            "Unknown OAuth2 provider '{provider}'"
        )));
    }
    if request.code.trim().is_empty() {
        return Err(ApiError::InvalidInput(String::from(
            "Authorization code is required",
        )));
    }

    let callback = OAuthCallback {
        provider,
        code: request.code,
        state: request.state.filter(|state| !state.is_empty()),
    };

    let session = OAuthCallbackUseCase::new(state.provider, state.storer)
        .execute(callback, client_context(&headers))
        .await?;

    Ok(session_response(session))
}

fn client_context(headers: &HeaderMap) -> ClientContext {
    ClientContext {
        cookie: headers
            .get(COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(String::from),
    }
}

// Provider names end up in the upstream URL path
fn is_valid_provider_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

/// Copy the provider's status, headers and body onto our response.
fn session_response(session: IdentitySession) -> Response {
    let status = StatusCode::from_u16(session.status).unwrap_or(StatusCode::BAD_GATEWAY);

    let body = if session.body.is_null() {
        Body::empty()
    } else {
        Body::from(session.body.to_string())
    };

    let mut response = (status, body).into_response();
    let headers = response.headers_mut();
    if !session.body.is_null() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    for (name, value) in &session.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping malformed header from provider"),
        }
    }

    response
}
