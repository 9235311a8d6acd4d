use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("Clicks per second must be greater than 0")]
    InvalidRate,

    #[error("Click count must be greater than 0")]
    InvalidLimit,
}

/// Failures reported by the click primitive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClickError {
    /// The pointer sat on a protected screen corner.
    #[error("mouse moved to a screen corner (fail-safe)")]
    FailSafe,

    #[error("input simulation is unavailable: {0}")]
    Unavailable(String),

    #[error("failed to send click: {0}")]
    Input(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StartError {
    #[error(transparent)]
    Invalid(#[from] SettingsError),

    #[error("a clicking run is already active")]
    AlreadyRunning,

    #[error("input simulation is not available on this system")]
    BackendUnavailable,
}
