use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use serde::Deserialize;

use crate::constants::*;
use sensorsign_core::{utils::Redact, Context, Error, Result};

/// Config carries all the configuration for one observation API data source.
///
/// Each data source owns its own `Config`. There is no process wide default.
#[derive(Clone, Default)]
pub struct Config {
    /// `server_url` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `SENSORSIGN_SERVER_URL`
    pub server_url: Option<String>,
    /// `base_path` is prefixed to every endpoint path and is part of the
    /// signed path. Loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `SENSORSIGN_BASE_PATH`
    pub base_path: Option<String>,
    /// `auth_method` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `SENSORSIGN_AUTH_METHOD`
    ///
    /// Falls back to [`crate::DEFAULT_AUTH_METHOD`] when neither is set.
    pub auth_method: Option<String>,
    /// `client_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `SENSORSIGN_CLIENT_ID`
    pub client_id: Option<String>,
    /// `secret_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `SENSORSIGN_SECRET_KEY`
    pub secret_key: Option<String>,
}

/// Plain settings of a data source instance, as stored by the plugin host.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Settings {
    server_url: Option<String>,
    base_path: Option<String>,
    auth_method: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set server_url
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = Some(server_url.into());
        self
    }

    /// Set base_path
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Set auth_method
    pub fn with_auth_method(mut self, auth_method: impl Into<String>) -> Self {
        self.auth_method = Some(auth_method.into());
        self
    }

    /// Set client_id
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set secret_key
    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Load config from env.
    ///
    /// Fields that are already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(SENSORSIGN_SERVER_URL) {
            self.server_url.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SENSORSIGN_BASE_PATH) {
            self.base_path.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SENSORSIGN_AUTH_METHOD) {
            self.auth_method.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SENSORSIGN_CLIENT_ID) {
            self.client_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(SENSORSIGN_SECRET_KEY) {
            self.secret_key.get_or_insert(v);
        }

        self
    }

    /// Load config from a data source settings document.
    ///
    /// `json_data` holds the plain settings (`serverUrl`, `basePath`,
    /// `authMethod`). `secure_json_data` holds the decrypted secrets keyed by
    /// `clientId` and `secretKey`.
    pub fn from_settings(
        json_data: &[u8],
        secure_json_data: &HashMap<String, String>,
    ) -> Result<Self> {
        let settings: Settings = serde_json::from_slice(json_data).map_err(|e| {
            Error::config_invalid("could not unmarshal data source settings json").with_source(e)
        })?;

        Ok(Self {
            server_url: settings.server_url,
            base_path: settings.base_path,
            auth_method: settings.auth_method,
            client_id: secure_json_data.get(SETTINGS_CLIENT_ID).cloned(),
            secret_key: secure_json_data.get(SETTINGS_SECRET_KEY).cloned(),
        })
    }

    /// Auth method to send, falling back to [`crate::DEFAULT_AUTH_METHOD`].
    pub fn auth_method(&self) -> &str {
        self.auth_method.as_deref().unwrap_or(DEFAULT_AUTH_METHOD)
    }

    /// Base path to prefix, empty if unset.
    pub fn base_path(&self) -> &str {
        self.base_path.as_deref().unwrap_or_default()
    }

    /// Check that every setting a request needs is present.
    ///
    /// Reports the first missing one, checked in this order: secret key,
    /// client id, server url, auth method.
    pub fn validate(&self) -> Result<()> {
        fn missing(v: &Option<String>) -> bool {
            v.as_deref().map_or(true, str::is_empty)
        }

        if missing(&self.secret_key) {
            return Err(Error::config_invalid("HMAC signing key is missing"));
        }
        if missing(&self.client_id) {
            return Err(Error::config_invalid("Client ID is missing"));
        }
        if missing(&self.server_url) {
            return Err(Error::config_invalid("Server URL is missing"));
        }
        if self.auth_method.as_deref() == Some("") {
            return Err(Error::config_invalid("AuthMethod is missing"));
        }

        Ok(())
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_url", &self.server_url)
            .field("base_path", &self.base_path)
            .field("auth_method", &self.auth_method)
            .field("client_id", &self.client_id.as_ref().map(Redact::from))
            .field("secret_key", &self.secret_key.as_ref().map(Redact::from))
            .finish()
    }
}
