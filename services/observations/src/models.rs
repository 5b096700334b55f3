//! Response bodies of the observation API.
//!
//! The list operations on [`crate::Client`] return raw responses. These
//! types are for callers that want to decode them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sensorsign_core::Result;

/// A site or sensor platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thing {
    /// Thing id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Known positions of the thing.
    #[serde(default)]
    pub location: Vec<Location>,
}

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude.
    pub latitude: f32,
    /// Longitude.
    pub longitude: f32,
}

/// A named series of observations belonging to one thing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStream {
    /// Data stream id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Unit of the observed values.
    #[serde(default)]
    pub unit_of_measurement: UnitOfMeasurement,
}

/// Unit of measurement of a data stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOfMeasurement {
    /// Unit name, e.g. `degree Celsius`.
    #[serde(default)]
    pub name: String,
    /// Unit symbol, e.g. `°C`.
    #[serde(default)]
    pub symbol: String,
}

/// A single reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Observed value.
    pub value: f64,
    /// Time of the observation in epoch milliseconds.
    pub phenomenon_time: i64,
}

/// A thing together with all its data streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThingWithDataStreams {
    /// The thing.
    pub thing: Thing,
    /// Its data streams, in server order.
    pub data_streams: Vec<DataStream>,
}

/// Observations of one data stream, labeled with the data stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStreamObservations {
    /// The data stream.
    pub data_stream: DataStream,
    /// Its observations, in server order.
    pub observations: Vec<Observation>,
}

/// Decode the body of a things listing.
pub fn parse_things(body: &[u8]) -> Result<Vec<Thing>> {
    Ok(serde_json::from_slice(body)?)
}

/// Decode the body of a data streams listing.
pub fn parse_data_streams(body: &[u8]) -> Result<Vec<DataStream>> {
    Ok(serde_json::from_slice(body)?)
}

/// A reading as sent by the server. `value` may be `null`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawObservation {
    value: Option<f64>,
    phenomenon_time: i64,
}

impl RawObservation {
    fn into_observation(self) -> Option<Observation> {
        let value = self.value.filter(|v| v.is_finite())?;
        Some(Observation {
            value,
            phenomenon_time: self.phenomenon_time,
        })
    }
}

/// Decode the body of an observations query.
///
/// The body maps data stream ids to observation arrays. Entries that are not
/// an array are skipped. Inside an array each reading is decoded on its own:
/// readings that do not decode, or whose value is null or not finite, are
/// dropped while the rest of the data stream is kept. Data streams left
/// without any observation are dropped.
pub fn parse_observations(body: &[u8]) -> Result<BTreeMap<String, Vec<Observation>>> {
    let partial: BTreeMap<String, Value> = serde_json::from_slice(body)?;

    Ok(partial
        .into_iter()
        .filter_map(|(id, raw)| {
            let Value::Array(readings) = raw else {
                return None;
            };
            let observations: Vec<Observation> = readings
                .into_iter()
                .filter_map(|v| serde_json::from_value::<RawObservation>(v).ok())
                .filter_map(RawObservation::into_observation)
                .collect();
            (!observations.is_empty()).then_some((id, observations))
        })
        .collect())
}
