//! Error types for the fallible edges of the registry.
//!
//! Builder methods, [`Registry::match_event`](crate::Registry::match_event) and
//! [`Registry::flush`](crate::Registry::flush) never fail: rejected input is a
//! silent no-op. Errors only surface where a caller explicitly asks for
//! validation, such as parsing an [`EventName`](crate::EventName) or loading a
//! [`RegistryConfig`](crate::RegistryConfig).

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = SwitchboardError> = std::result::Result<T, E>;

/// Errors produced by switchboard validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwitchboardError {
    /// An event name was empty.
    #[error("event name must not be empty")]
    EmptyEventName,

    /// A namespace passed to a join was empty.
    #[error("namespace must not be empty")]
    EmptyNamespace,

    /// A task was empty once its leading separator was stripped.
    #[error("task under namespace `{namespace}` is empty")]
    EmptyTask { namespace: String },

    /// The configured separator cannot delimit event names.
    #[error("separator {0:?} must not be whitespace")]
    InvalidSeparator(char),

    /// Configuration could not be parsed.
    #[error("invalid registry config: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SwitchboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
