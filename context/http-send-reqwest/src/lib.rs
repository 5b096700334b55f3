//! [`HttpSend`] implementation backed by [`reqwest`].
//!
//! ```no_run
//! use sensorsign_core::Context;
//! use sensorsign_http_send_reqwest::ReqwestHttpSend;
//!
//! let client = reqwest::Client::builder()
//!     .timeout(std::time::Duration::from_secs(30))
//!     .build()
//!     .expect("client must build");
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Client, Request};
use sensorsign_core::{Error, HttpSend, Result};

/// ReqwestHttpSend sends signed requests with a [`reqwest::Client`].
///
/// Timeouts, proxies and TLS settings belong to the client passed in.
/// Every HTTP status is returned as a response; only transport failures
/// become [`sensorsign_core::ErrorKind::Network`].
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req).map_err(|e| {
            Error::request_invalid("failed to convert request for reqwest").with_source(e)
        })?;
        debug!("sending {} {}", req.method(), req.url().path());

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::network("failed to send request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::network("failed to read response body").with_source(e))?;
        debug!("received {} with {} bytes", parts.status, bs.len());

        Ok(http::Response::from_parts(parts, bs))
    }
}
