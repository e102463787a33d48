//! Outcome - result of bubbling one event

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a dispatch.
///
/// `Unhandled` means the walk reached the root (or a revisited node) without
/// any handler consuming the event. It is an ordinary result; the caller
/// decides whether it warrants a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Handled,
    Unhandled,
}

impl Outcome {
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }

    pub fn is_unhandled(self) -> bool {
        !self.is_handled()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Handled => "handled",
            Self::Unhandled => "unhandled",
        }
    }
}

impl From<bool> for Outcome {
    /// Maps a handler's "consumed" flag.
    fn from(consumed: bool) -> Self {
        if consumed {
            Self::Handled
        } else {
            Self::Unhandled
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_consumed_flag() {
        assert_eq!(Outcome::from(true), Outcome::Handled);
        assert_eq!(Outcome::from(false), Outcome::Unhandled);
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&Outcome::Unhandled).unwrap(),
            "\"unhandled\""
        );
    }
}
