use sensorsign_core::{Context, OsEnv};
use sensorsign_http_send_reqwest::ReqwestHttpSend;
use sensorsign_observations::{Client, Config};

/// Context sending over a default [`reqwest::Client`] and reading the
/// process environment.
pub fn default_context() -> Context {
    Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}

/// Client configured entirely from the `SENSORSIGN_*` environment variables.
///
/// Nothing is validated here; a missing setting surfaces on the first
/// request or through [`Client::check_health`].
pub fn default_client() -> Client {
    let ctx = default_context();
    let config = Config::new().from_env(&ctx);
    Client::new(ctx, config)
}
