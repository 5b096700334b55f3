use async_trait::async_trait;
use sensorsign_core::{Context, ProvideCredential, ProvideCredentialChain, Result};
use std::sync::Arc;

use crate::config::Config;
use crate::credential::Credential;
use crate::provide_credential::{ConfigCredentialProvider, EnvCredentialProvider};

/// DefaultCredentialProvider will try to load credential from different sources.
///
/// Resolution order:
///
/// 1. The data source config
/// 2. Environment variables
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain<Credential>,
}

impl DefaultCredentialProvider {
    /// Create a new DefaultCredentialProvider
    pub fn new(config: Arc<Config>) -> Self {
        let chain = ProvideCredentialChain::new()
            .push(ConfigCredentialProvider::new(config))
            .push(EnvCredentialProvider::new());

        Self { chain }
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain<Credential>) -> Self {
        Self { chain }
    }

    /// Add a credential provider to the front of the default chain.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use sensorsign_observations::{Config, DefaultCredentialProvider, StaticCredentialProvider};
    ///
    /// let provider = DefaultCredentialProvider::new(Arc::new(Config::default()))
    ///     .push_front(StaticCredentialProvider::new("client_id", "c2VjcmV0LWtleQ=="));
    /// ```
    pub fn push_front(
        mut self,
        provider: impl ProvideCredential<Credential = Credential> + 'static,
    ) -> Self {
        self.chain = self.chain.push_front(provider);
        self
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}
