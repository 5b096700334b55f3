use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use log::debug;
use sensorsign_core::time::DateTime;
use sensorsign_core::{Context, Error, ProvideCredential, Result, SigningCredential};

use crate::config::Config;
use crate::credential::Credential;
use crate::health::HealthCheck;
use crate::models::{
    parse_data_streams, parse_observations, parse_things, DataStreamObservations,
    ThingWithDataStreams,
};
use crate::provide_credential::DefaultCredentialProvider;
use crate::resource::ResourceQuery;
use crate::sign_request::RequestSigner;

/// Client issues signed GET requests against one observation API data source.
///
/// A client owns the configuration of its data source and nothing else: no
/// cached credential, no session. Cloning is cheap and clones may be used
/// concurrently.
///
/// ```no_run
/// # async fn example() -> sensorsign_core::Result<()> {
/// use sensorsign_core::Context;
/// use sensorsign_observations::{Client, Config};
///
/// let config = Config::new()
///     .with_server_url("https://api.example.com")
///     .with_client_id("client")
///     .with_secret_key("c2VjcmV0LWtleQ==");
/// let client = Client::new(Context::new(), config);
///
/// let resp = client.list_things().await?;
/// println!("{}", resp.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    config: Arc<Config>,
    signer: RequestSigner,
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,
}

impl Client {
    /// Create a client for the data source described by `config`.
    ///
    /// Credentials are taken from `config` first, then from the environment
    /// of `ctx`.
    pub fn new(ctx: Context, config: Config) -> Self {
        let config = Arc::new(config);
        let signer = RequestSigner::new(config.auth_method());
        let provider = Arc::new(DefaultCredentialProvider::new(config.clone()));

        Self {
            ctx,
            config,
            signer,
            provider,
        }
    }

    /// Replace the credential provider.
    pub fn with_credential_provider(
        mut self,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Replace the time source used for signing.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime + Send + Sync + 'static) -> Self {
        self.signer = self.signer.with_clock(clock);
        self
    }

    /// The configuration of this data source.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// List all things of the account: `GET {base}/sites`.
    pub async fn list_things(&self) -> Result<http::Response<Bytes>> {
        self.send(&ResourceQuery::things()).await
    }

    /// List the data streams of one thing: `GET {base}/site/{thing_id}/datastreams`.
    pub async fn list_data_streams(&self, thing_id: &str) -> Result<http::Response<Bytes>> {
        self.send(&ResourceQuery::data_streams(thing_id)).await
    }

    /// List observations of `data_stream_ids` within `[from, until]`.
    ///
    /// Ids are sent in the given order. An empty id list is rejected before
    /// anything is signed.
    pub async fn list_observations<I, S>(
        &self,
        data_stream_ids: I,
        from: DateTime,
        until: DateTime,
    ) -> Result<http::Response<Bytes>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send(&ResourceQuery::observations(data_stream_ids, from, until))
            .await
    }

    /// Build the path for `query`, sign it and send it.
    pub async fn send(&self, query: &ResourceQuery) -> Result<http::Response<Bytes>> {
        let path = query.path(self.config.base_path())?;
        self.signed_get(&path).await
    }

    /// Sign and send a GET of `path`, which must include any query string.
    ///
    /// The response is returned whatever its status. Errors are raised only
    /// for missing configuration, an undecodable key, an invalid request, or
    /// a transport failure; the first three never reach the network.
    pub async fn signed_get(&self, path: &str) -> Result<http::Response<Bytes>> {
        let server_url = self
            .config
            .server_url
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("Server URL is missing"))?;
        let cred = self.credential().await?;
        let headers = self.signer.compose(&cred, path)?;

        let (mut parts, body) = http::Request::get(format!("{server_url}{path}"))
            .body(Bytes::new())?
            .into_parts();
        headers.apply(&mut parts)?;

        let resp = self
            .ctx
            .http_send(http::Request::from_parts(parts, body))
            .await?;
        debug!("GET {path} returned {}", resp.status());

        Ok(resp)
    }

    /// List every thing together with its data streams.
    ///
    /// Any response other than 200 fails the whole listing.
    pub async fn list_things_with_data_streams(&self) -> Result<Vec<ThingWithDataStreams>> {
        let resp = expect_ok(self.list_things().await?)?;
        let things = parse_things(resp.body())?;

        let mut resources = Vec::with_capacity(things.len());
        for thing in things {
            let resp = expect_ok(self.list_data_streams(&thing.id).await?)?;
            let data_streams = parse_data_streams(resp.body())?;
            resources.push(ThingWithDataStreams {
                thing,
                data_streams,
            });
        }

        Ok(resources)
    }

    /// Query the observations of every data stream of one thing.
    ///
    /// The data streams of `thing_id` are listed first, then all of their
    /// ids are requested in one observations query over `[from, until]`.
    /// Results follow the data stream order of the listing; data streams
    /// without observations are left out. Any response other than 200 fails
    /// the query.
    pub async fn query_thing(
        &self,
        thing_id: &str,
        from: DateTime,
        until: DateTime,
    ) -> Result<Vec<DataStreamObservations>> {
        let resp = expect_ok(self.list_data_streams(thing_id).await?)?;
        let data_streams = parse_data_streams(resp.body())?;
        if data_streams.is_empty() {
            debug!("thing {thing_id} has no data streams");
            return Ok(Vec::new());
        }

        let ids: Vec<&str> = data_streams.iter().map(|ds| ds.id.as_str()).collect();
        let resp = expect_ok(self.list_observations(ids, from, until).await?)?;
        let mut observations = parse_observations(resp.body())?;

        Ok(data_streams
            .into_iter()
            .filter_map(|data_stream| {
                let observations = observations.remove(&data_stream.id)?;
                Some(DataStreamObservations {
                    data_stream,
                    observations,
                })
            })
            .collect())
    }

    /// Check that the data source is configured and answers with things.
    ///
    /// Never fails; problems are reported in the returned [`HealthCheck`].
    pub async fn check_health(&self) -> HealthCheck {
        let cred = match self.provider.provide_credential(&self.ctx).await {
            Ok(cred) => cred,
            Err(e) => return HealthCheck::error(format!("Request failed: {e}")),
        };
        // Validate the credential requests will sign with, not the raw config.
        let mut effective = self.config.as_ref().clone();
        effective.client_id = cred.as_ref().map(|c| c.client_id.clone());
        effective.secret_key = cred.map(|c| c.secret_key);
        if let Err(e) = effective.validate() {
            return HealthCheck::error(e.to_string());
        }

        let resp = match self.list_things().await {
            Ok(resp) => resp,
            Err(e) => return HealthCheck::error(format!("Request failed: {e}")),
        };
        if resp.status() != StatusCode::OK {
            return HealthCheck::error(format!(
                "Request failed: {}",
                String::from_utf8_lossy(resp.body())
            ));
        }
        let things = match parse_things(resp.body()) {
            Ok(things) => things,
            Err(e) => return HealthCheck::error(format!("Unmarshaling failed: {e}")),
        };
        if things.is_empty() {
            return HealthCheck::error("No root nodes found");
        }

        HealthCheck::ok("Data source is working")
    }

    async fn credential(&self) -> Result<Credential> {
        self.provider
            .provide_credential(&self.ctx)
            .await?
            .filter(|cred| cred.is_valid())
            .ok_or_else(|| Error::credential_invalid("no valid credential found"))
    }
}

fn expect_ok(resp: http::Response<Bytes>) -> Result<http::Response<Bytes>> {
    if resp.status() == StatusCode::OK {
        return Ok(resp);
    }

    Err(Error::unexpected(format!(
        "request failed with status {}: {}",
        resp.status(),
        String::from_utf8_lossy(resp.body())
    )))
}
