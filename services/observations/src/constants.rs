// Env values used by the observation API signer.
pub const SENSORSIGN_SERVER_URL: &str = "SENSORSIGN_SERVER_URL";
pub const SENSORSIGN_BASE_PATH: &str = "SENSORSIGN_BASE_PATH";
pub const SENSORSIGN_AUTH_METHOD: &str = "SENSORSIGN_AUTH_METHOD";
pub const SENSORSIGN_CLIENT_ID: &str = "SENSORSIGN_CLIENT_ID";
pub const SENSORSIGN_SECRET_KEY: &str = "SENSORSIGN_SECRET_KEY";

// Keys of the data source settings document.
pub const SETTINGS_CLIENT_ID: &str = "clientId";
pub const SETTINGS_SECRET_KEY: &str = "secretKey";

/// Scheme label sent in front of the encoded client id.
pub const DEFAULT_AUTH_METHOD: &str = "xCloud";

// Path segments of the observation API.
pub const THINGS_COLLECTION: &str = "sites";
// Singular on purpose: `/sites/{id}/datastreams` is answered with a 500, not a 404.
pub const THING_ROOT: &str = "site";
pub const DATA_STREAMS_COLLECTION: &str = "datastreams";
pub const OBSERVATIONS_COLLECTION: &str = "observations";

// Query parameters of the observations endpoint.
pub const QUERY_FROM: &str = "from";
pub const QUERY_UNTIL: &str = "until";
pub const QUERY_DATA_STREAM_IDS: &str = "datastreamIds";
