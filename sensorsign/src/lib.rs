#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use sensorsign_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::{default_client, default_context};

/// Signing and the client of the sensor observation API.
pub mod observations {
    pub use sensorsign_observations::*;
}
