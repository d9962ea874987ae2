//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QlearnError {
    /// More samples were requested than the replay memory holds.
    ///
    /// Agents treat this as a signal to skip the optimization step.
    #[error("insufficient data: requested {requested} samples, buffer holds {available}")]
    InsufficientData {
        /// Number of requested samples.
        requested: usize,

        /// Number of samples in the buffer.
        available: usize,
    },

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
