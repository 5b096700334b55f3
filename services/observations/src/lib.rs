//! Signed requests for the sensor observation API.
//!
//! Every request is a GET authenticated with an HMAC-SHA256 signature over a
//! fixed seven line message. See [`sign_request`] for the exact format.
//!
//! The API exposes three resources:
//!
//! - `GET /sites`: all things of the account
//! - `GET /site/{thing_id}/datastreams`: the data streams of one thing
//! - `GET /observations?from=..&until=..&datastreamIds=..`: observations of
//!   one or more data streams within a time range
//!
//! [`Client`] signs and sends them and hands back the raw response.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::DEFAULT_AUTH_METHOD;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::{
    ConfigCredentialProvider, DefaultCredentialProvider, EnvCredentialProvider,
    StaticCredentialProvider,
};

pub mod sign_request;
pub use sign_request::{RequestSigner, SignedHeaders};

mod resource;
pub use resource::ResourceQuery;

pub mod models;

mod health;
pub use health::{HealthCheck, HealthStatus};

mod client;
pub use client::Client;
