use std::time::Duration;

use reqwest::{
    Client, RequestBuilder, Response, Url,
    header::{ACCEPT, COOKIE},
    redirect::Policy,
};
use secrecy::ExposeSecret;
use userbase_core::{
    ClientContext, Credentials, IdentityError, IdentityProvider, IdentitySession, OAuthCallback,
};

/// Identity provider reached over HTTP.
///
/// Login and OAuth2 callbacks are proxied to the provider as-is and its
/// status, end-to-end headers and JSON body are handed back. The HTTP
/// client must not follow redirects or keep a cookie jar, otherwise the
/// provider's cookies never reach the caller.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    http_client: Client,
    base_url: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: String, http_client: Client) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url
        } else {
            format!("{base_url}/")
        };

        Self {
            http_client,
            base_url,
        }
    }

    /// Build a provider with a client suited to proxying.
    pub fn build(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;

        Ok(Self::new(base_url, http_client))
    }

    fn url(&self, path: &str) -> Result<Url, IdentityError> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join(path))
            .map_err(|e| IdentityError::Unavailable(e.to_string()))
    }

    async fn forward(
        &self,
        request: RequestBuilder,
        client: ClientContext,
    ) -> Result<IdentitySession, IdentityError> {
        let mut request = request.header(ACCEPT, "application/json");
        if let Some(cookie) = client.cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        into_session(response).await
    }
}

/// Headers that describe the provider connection or the original body
/// encoding rather than the answer itself.
const SKIPPED_HEADERS: [&str; 10] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
    "content-type",
];

async fn into_session(response: Response) -> Result<IdentitySession, IdentityError> {
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter(|(name, _)| !SKIPPED_HEADERS.contains(&name.as_str()))
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    let bytes = response
        .bytes()
        .await
        .map_err(|e| IdentityError::Unavailable(e.to_string()))?;
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    Ok(IdentitySession {
        status,
        headers,
        body,
    })
}

#[async_trait::async_trait]
impl IdentityProvider for HttpIdentityProvider {
    #[tracing::instrument(name = "Forwarding login to identity provider", skip_all)]
    async fn authenticate(
        &self,
        credentials: Credentials,
        client: ClientContext,
    ) -> Result<IdentitySession, IdentityError> {
        let url = self.url(LOGIN_PATH)?;

        let request_body = LoginRequest {
            email: credentials.email.as_str(),
            password: credentials.password.expose_secret(),
        };

        self.forward(self.http_client.post(url).json(&request_body), client)
            .await
    }

    #[tracing::instrument(name = "Forwarding OAuth2 callback to identity provider", skip_all)]
    async fn complete_oauth(
        &self,
        callback: OAuthCallback,
        client: ClientContext,
    ) -> Result<IdentitySession, IdentityError> {
        let url = self.url(&format!("oauth2/{}/callback", callback.provider))?;

        let mut query = vec![("code", callback.code.as_str())];
        if let Some(state) = callback.state.as_deref() {
            query.push(("state", state));
        }

        self.forward(self.http_client.get(url).query(&query), client)
            .await
    }
}

const LOGIN_PATH: &str = "login";

#[derive(serde::Serialize, Debug)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}
