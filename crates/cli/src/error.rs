//! Error types for CLI operations.

use contracts::{ContractError, NodeId};
use dispatcher::DispatcherError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Blueprint file not found
    #[error("Blueprint file not found: {path}")]
    ConfigNotFound { path: String },

    /// Blueprint could not be loaded
    #[error(transparent)]
    Config(#[from] ContractError),

    /// An event bubbled to the root under the `fail` policy
    #[error("Event #{index} '{kind}' raised at '{start}' was not handled")]
    UnhandledEvent {
        index: usize,
        kind: String,
        start: NodeId,
        #[source]
        source: DispatcherError,
    },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn unhandled_event(
        index: usize,
        kind: impl Into<String>,
        start: NodeId,
        source: DispatcherError,
    ) -> Self {
        Self::UnhandledEvent {
            index,
            kind: kind.into(),
            start,
            source,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhandled_event_message() {
        let err = CliError::unhandled_event(
            2,
            "scroll",
            NodeId::from("list"),
            DispatcherError::unhandled(NodeId::from("list")),
        );
        assert_eq!(
            err.to_string(),
            "Event #2 'scroll' raised at 'list' was not handled"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: CliError = ContractError::config_parse("bad toml").into();
        assert_eq!(
            err.to_string(),
            ContractError::config_parse("bad toml").to_string()
        );
    }
}
