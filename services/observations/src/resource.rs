use log::debug;
use sensorsign_core::time::{format_iso8601_millis, DateTime};
use sensorsign_core::{Error, Result};

use crate::constants::*;

/// The resources exposed by the observation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceQuery {
    /// All things (sites) of the account.
    Things,
    /// All data streams of one thing.
    DataStreams {
        /// Id of the thing.
        thing_id: String,
    },
    /// Observations of one or more data streams within `[from, until]`.
    Observations {
        /// Data stream ids, in the order they are sent. Must not be empty.
        data_stream_ids: Vec<String>,
        /// Start of the range.
        from: DateTime,
        /// End of the range.
        until: DateTime,
    },
}

impl ResourceQuery {
    /// Query for all things.
    pub fn things() -> Self {
        Self::Things
    }

    /// Query for the data streams of `thing_id`.
    pub fn data_streams(thing_id: impl Into<String>) -> Self {
        Self::DataStreams {
            thing_id: thing_id.into(),
        }
    }

    /// Query for observations of `data_stream_ids` within `[from, until]`.
    pub fn observations<I, S>(data_stream_ids: I, from: DateTime, until: DateTime) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Observations {
            data_stream_ids: data_stream_ids.into_iter().map(Into::into).collect(),
            from,
            until,
        }
    }

    /// Build the path to request and sign, query string included.
    ///
    /// `base_path` is prepended verbatim. An observations query without any
    /// data stream id is rejected.
    pub fn path(&self, base_path: &str) -> Result<String> {
        let path = match self {
            ResourceQuery::Things => format!("{base_path}/{THINGS_COLLECTION}"),
            ResourceQuery::DataStreams { thing_id } => {
                format!("{base_path}/{THING_ROOT}/{thing_id}/{DATA_STREAMS_COLLECTION}")
            }
            ResourceQuery::Observations {
                data_stream_ids,
                from,
                until,
            } => {
                if data_stream_ids.is_empty() {
                    return Err(Error::request_invalid(
                        "observations query requires at least one data stream id",
                    ));
                }

                let mut query = form_urlencoded::Serializer::new(String::new());
                query.append_pair(QUERY_FROM, &format_iso8601_millis(*from));
                query.append_pair(QUERY_UNTIL, &format_iso8601_millis(*until));
                for id in data_stream_ids {
                    query.append_pair(QUERY_DATA_STREAM_IDS, id);
                }

                format!("{base_path}/{OBSERVATIONS_COLLECTION}?{}", query.finish())
            }
        };

        debug!("built resource path: {path}");
        Ok(path)
    }
}
