/// Outcome of [`crate::Client::check_health`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// The data source answered with at least one thing.
    Ok,
    /// Configuration, signing or the remote call failed.
    Error,
}

/// Health report for one data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    /// Overall status.
    pub status: HealthStatus,
    /// Human readable explanation.
    pub message: String,
}

impl HealthCheck {
    pub(crate) fn ok(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Ok,
            message: message.into(),
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Error,
            message: message.into(),
        }
    }

    /// Check if the data source is healthy.
    pub fn is_ok(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}
