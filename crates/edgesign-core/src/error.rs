//! Error types for the edgesign core.

/// Core error type for edgesign infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum EdgesignError {
    /// An environment variable holds a value that cannot be used.
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidSetting {
        /// The environment variable name.
        key: &'static str,
        /// The rejected raw value.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Convenience result type for edgesign operations.
pub type EdgesignResult<T> = Result<T, EdgesignError>;
