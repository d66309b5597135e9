//! Error types surfaced by the measurement core.

use thiserror::Error;

/// Tracking-session problems. These are always surfaced to the caller; the
/// user has to know an in-progress measurement was affected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    /// The device cannot run spatial tracking. Fatal for the screen.
    #[error("spatial tracking is not supported on this device")]
    Unsupported,

    #[error("tracking session was interrupted")]
    Interrupted,

    #[error("tracking session failed: {0}")]
    Failed(String),
}

impl TrackingError {
    /// Create a failure error.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// Whether measuring cannot begin at all on this screen.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unsupported)
    }
}

/// Problems loading [`MeasureSettings`](crate::settings::MeasureSettings).
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse measure settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid measure settings: {0}")]
    Invalid(String),
}

impl SettingsError {
    pub fn invalid(details: impl Into<String>) -> Self {
        Self::Invalid(details.into())
    }
}
