//! HMAC request signing for the observation API.
//!
//! ## Format
//!
//! The string to sign is seven fields joined by `\n`, with no trailing newline:
//!
//! ```text
//! "GET" + "\n" +
//! Content-Type + "\n" +        (always empty, no body)
//! Date + "\n" +                (ISO 8601, millisecond precision, UTC)
//! Path + "\n" +                (including the query string, verbatim)
//! ServiceHeaders + "\n" +      (always empty)
//! Content-Digest + "\n" +      (always empty, no body)
//! ClientId
//! ```
//!
//! The server rebuilds the same string from the `Date` header and the
//! request line, so the empty fields must stay in place.
//!
//! `path` and `client_id` are not escaped. A newline inside either still
//! produces a signature, just not one the server will agree with.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::header::DATE;
use http::HeaderValue;
use http::Method;
use log::debug;
use sensorsign_core::hash::{base64_decode, base64_encode, base64_hmac_sha256};
use sensorsign_core::time::{format_iso8601_millis, now, DateTime};
use sensorsign_core::utils::Redact;
use sensorsign_core::{Error, Result};

use crate::credential::Credential;

/// The signable fields of one GET request.
///
/// Only `timestamp`, `path` and `client_id` vary; the method and the three
/// empty fields are fixed by the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignableRequest<'a> {
    timestamp: &'a str,
    path: &'a str,
    client_id: &'a str,
}

impl<'a> SignableRequest<'a> {
    /// Create the signable fields for a GET request.
    pub fn get(timestamp: &'a str, path: &'a str, client_id: &'a str) -> Self {
        Self {
            timestamp,
            path,
            client_id,
        }
    }

    /// HTTP method, always `GET`.
    pub fn method(&self) -> Method {
        Method::GET
    }

    /// Timestamp embedded in the message.
    pub fn timestamp(&self) -> &'a str {
        self.timestamp
    }

    /// Path and query string embedded in the message.
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Client id embedded in the message, unencoded.
    pub fn client_id(&self) -> &'a str {
        self.client_id
    }
}

/// Build the canonical message for `req`.
pub fn canonical_message(req: &SignableRequest<'_>) -> String {
    [
        req.method().as_str(),
        "", // content type, no body
        req.timestamp,
        req.path,
        "", // service specific headers
        "", // content digest, no body
        req.client_id,
    ]
    .join("\n")
}

/// Sign `message` with the base64 encoded `secret_key`.
///
/// Returns the base64 encoded HMAC-SHA256 digest. A key that is not valid
/// base64 fails with [`sensorsign_core::ErrorKind::KeyDecode`].
pub fn sign(message: &str, secret_key: &str) -> Result<String> {
    let key = base64_decode(secret_key)
        .map_err(|e| Error::key_decode("secret key is not valid base64").with_source(e))?;

    Ok(base64_hmac_sha256(&key, message.as_bytes()))
}

/// Headers produced for exactly one signed request.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// Value of the `Date` header, identical to the signed timestamp.
    pub date: String,
    /// Value of the `Authorization` header.
    pub authorization: String,
}

impl SignedHeaders {
    /// Insert `Date` and `Authorization` into the request.
    pub fn apply(self, parts: &mut http::request::Parts) -> Result<()> {
        parts.headers.insert(DATE, self.date.parse()?);
        parts.headers.insert(AUTHORIZATION, {
            let mut value: HeaderValue = self.authorization.parse()?;
            value.set_sensitive(true);

            value
        });

        Ok(())
    }
}

impl Debug for SignedHeaders {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedHeaders")
            .field("date", &self.date)
            .field("authorization", &Redact::from(&self.authorization))
            .finish()
    }
}

/// Compose the signed headers for a GET of `path` at instant `now`.
///
/// The timestamp is formatted once and used for both the `Date` header and
/// the signed message.
pub fn compose_headers(
    auth_method: &str,
    cred: &Credential,
    path: &str,
    now: DateTime,
) -> Result<SignedHeaders> {
    let timestamp = format_iso8601_millis(now);
    let req = SignableRequest::get(&timestamp, path, &cred.client_id);
    let signature = sign(&canonical_message(&req), &cred.secret_key)?;
    debug!(
        "signed GET {path} at {timestamp} for client {}",
        Redact::from(&cred.client_id)
    );

    let authorization = format!(
        "{auth_method} {}:{signature}",
        base64_encode(cred.client_id.as_bytes())
    );
    Ok(SignedHeaders {
        date: timestamp,
        authorization,
    })
}

type Clock = Arc<dyn Fn() -> DateTime + Send + Sync>;

/// RequestSigner composes the `Date` and `Authorization` headers.
///
/// It holds no credential; the caller passes one for every request.
#[derive(Clone)]
pub struct RequestSigner {
    auth_method: String,
    clock: Clock,
}

impl Debug for RequestSigner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("auth_method", &self.auth_method)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Create a signer that reads the wall clock.
    pub fn new(auth_method: &str) -> Self {
        Self {
            auth_method: auth_method.to_string(),
            clock: Arc::new(now),
        }
    }

    /// Replace the time source.
    ///
    /// The clock is read exactly once per signed request.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(self, time: DateTime) -> Self {
        self.with_clock(move || time)
    }

    /// The auth method label sent in front of the client id.
    pub fn auth_method(&self) -> &str {
        &self.auth_method
    }

    /// Compose the signed headers for a GET of `path`.
    pub fn compose(&self, cred: &Credential, path: &str) -> Result<SignedHeaders> {
        compose_headers(&self.auth_method, cred, path, (self.clock)())
    }
}
