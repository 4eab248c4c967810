use userbase_core::{ClientContext, Credentials, IdentityError, IdentityProvider, IdentitySession};

/// Login use case - hands credentials to the identity provider
pub struct LoginUseCase<P>
where
    P: IdentityProvider,
{
    identity_provider: P,
}

impl<P> LoginUseCase<P>
where
    P: IdentityProvider,
{
    pub fn new(identity_provider: P) -> Self {
        Self { identity_provider }
    }

    /// Execute the login use case
    ///
    /// # Returns
    /// The provider's session answer, whatever its status, or
    /// `IdentityError` if the provider could not be reached
    #[tracing::instrument(name = "LoginUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        credentials: Credentials,
        client: ClientContext,
    ) -> Result<IdentitySession, IdentityError> {
        self.identity_provider
            .authenticate(credentials, client)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Login could not reach identity provider"))
    }
}
