use userbase_core::{
    ClientContext, Email, IdentityError, IdentityProvider, IdentitySession, IdentityStorer,
    OAuthCallback,
};

/// Error types for the OAuth2 callback use case
#[derive(Debug, thiserror::Error)]
pub enum OAuthCallbackError {
    #[error("Identity provider error: {0}")]
    IdentityError(#[from] IdentityError),
}

/// OAuth2 callback use case - completes the provider's authorization flow
/// and makes sure the identity has a user profile.
///
/// The provider has already issued its session by the time the profile is
/// saved, so a store failure is logged and the session is still returned.
pub struct OAuthCallbackUseCase<P, S>
where
    P: IdentityProvider,
    S: IdentityStorer,
{
    identity_provider: P,
    identity_storer: S,
}

impl<P, S> OAuthCallbackUseCase<P, S>
where
    P: IdentityProvider,
    S: IdentityStorer,
{
    pub fn new(identity_provider: P, identity_storer: S) -> Self {
        Self {
            identity_provider,
            identity_storer,
        }
    }

    #[tracing::instrument(name = "OAuthCallbackUseCase::execute", skip_all, fields(provider = %callback.provider))]
    pub async fn execute(
        &self,
        callback: OAuthCallback,
        client: ClientContext,
    ) -> Result<IdentitySession, OAuthCallbackError> {
        let session = self
            .identity_provider
            .complete_oauth(callback, client)
            .await?;

        if !session.is_success() {
            return Ok(session);
        }

        if let Some(raw_email) = session.email() {
            match Email::parse(raw_email) {
                Ok(email) => {
                    if let Err(e) = self.identity_storer.save_oauth2(email).await {
                        tracing::error!(operation = "save_oauth2", error = %e, "Could not save OAuth2 profile");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Identity provider reported an unusable email"),
            }
        }

        Ok(session)
    }
}
