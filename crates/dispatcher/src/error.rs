//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
///
/// Dispatch itself never fails; these only surface when a caller asks for an
/// unhandled event to be treated as an error.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Event bubbled to the root without being consumed
    #[error("event raised at node '{node}' was not handled by any ancestor")]
    Unhandled { node: String },

    /// Contract error
    #[error("contract error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatcherError {
    pub fn unhandled(node: impl std::fmt::Debug) -> Self {
        Self::Unhandled {
            node: format!("{node:?}"),
        }
    }
}
