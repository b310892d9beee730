// Error types for event validation

use thiserror::Error;

/// Result type alias for event validation
pub type Result<T> = std::result::Result<T, EventError>;

/// Errors raised while turning a client payload into a storable event.
/// All of them are the client's fault and must not cause a partial write.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventError {
    /// Timestamp missing or blank
    #[error("timestamp is required")]
    MissingTimestamp,

    /// Timestamp present but not a recognizable date
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Event type missing or blank
    #[error("type is required")]
    MissingEventType,

    /// Event type not in the type mapping
    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    /// A unit was supplied without a value
    #[error("unit requires a value")]
    UnitWithoutValue,

    /// A value was supplied and the type has no default unit
    #[error("value requires a unit for event type {0}")]
    ValueWithoutUnit(String),

    /// NaN or infinite value
    #[error("value must be a finite number")]
    InvalidValue,
}

impl EventError {
    /// Create an invalid timestamp error
    pub fn invalid_timestamp(input: impl Into<String>) -> Self {
        EventError::InvalidTimestamp(input.into())
    }
}
