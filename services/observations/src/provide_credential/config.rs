use async_trait::async_trait;
use sensorsign_core::{Context, ProvideCredential, Result};
use std::sync::Arc;

use crate::config::Config;
use crate::credential::Credential;

/// ConfigCredentialProvider will load credential from config.
///
/// Only the fields already present in the config are used; the environment
/// is left to [`crate::EnvCredentialProvider`].
#[derive(Debug)]
pub struct ConfigCredentialProvider {
    config: Arc<Config>,
}

impl ConfigCredentialProvider {
    /// Create a new loader via config.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        if let (Some(client_id), Some(secret_key)) = (&self.config.client_id, &self.config.secret_key)
        {
            return Ok(Some(Credential::new(client_id, secret_key)));
        }

        Ok(None)
    }
}
