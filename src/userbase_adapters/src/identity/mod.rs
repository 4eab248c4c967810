mod http_identity_provider;

pub use http_identity_provider::HttpIdentityProvider;

use userbase_core::{
    ClientContext, Credentials, IdentityError, IdentityProvider, IdentitySession, OAuthCallback,
};

use crate::config::IdentitySettings;

/// Stands in when no identity provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledIdentityProvider;

#[async_trait::async_trait]
impl IdentityProvider for DisabledIdentityProvider {
    async fn authenticate(
        &self,
        _credentials: Credentials,
        _client: ClientContext,
    ) -> Result<IdentitySession, IdentityError> {
        Err(IdentityError::Disabled)
    }

    async fn complete_oauth(
        &self,
        _callback: OAuthCallback,
        _client: ClientContext,
    ) -> Result<IdentitySession, IdentityError> {
        Err(IdentityError::Disabled)
    }
}

/// The identity provider the process was started with.
#[derive(Clone)]
pub enum ConfiguredIdentityProvider {
    Http(HttpIdentityProvider),
    Disabled(DisabledIdentityProvider),
}

impl ConfiguredIdentityProvider {
    pub fn from_settings(settings: &IdentitySettings) -> Result<Self, reqwest::Error> {
        match &settings.base_url {
            Some(base_url) => {
                let provider = HttpIdentityProvider::build(base_url.clone(), settings.timeout())?;
                Ok(Self::Http(provider))
            }
            None => {
                tracing::warn!("No identity provider configured, auth routes are disabled");
                Ok(Self::Disabled(DisabledIdentityProvider))
            }
        }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for ConfiguredIdentityProvider {
    async fn authenticate(
        &self,
        credentials: Credentials,
        client: ClientContext,
    ) -> Result<IdentitySession, IdentityError> {
        match self {
            Self::Http(provider) => provider.authenticate(credentials, client).await,
            Self::Disabled(provider) => provider.authenticate(credentials, client).await,
        }
    }

    async fn complete_oauth(
        &self,
        callback: OAuthCallback,
        client: ClientContext,
    ) -> Result<IdentitySession, IdentityError> {
        match self {
            Self::Http(provider) => provider.complete_oauth(callback, client).await,
            Self::Disabled(provider) => provider.complete_oauth(callback, client).await,
        }
    }
}
