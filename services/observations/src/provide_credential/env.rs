use crate::{constants::*, Credential};
use async_trait::async_trait;
use sensorsign_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `SENSORSIGN_CLIENT_ID`: The multi-tenant client id
/// - `SENSORSIGN_SECRET_KEY`: The base64 encoded HMAC key
///
/// Both must be present, otherwise nothing is returned.
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        match (
            ctx.env_var(SENSORSIGN_CLIENT_ID),
            ctx.env_var(SENSORSIGN_SECRET_KEY),
        ) {
            (Some(client_id), Some(secret_key)) => Ok(Some(Credential {
                client_id,
                secret_key,
            })),
            _ => Ok(None),
        }
    }
}
