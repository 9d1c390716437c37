//! Error taxonomy shared by the world graph and the session orchestrator.
use thiserror::Error;

/// Errors raised by a single game action. None of them is fatal to the
/// session: the state is left exactly as it was before the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("cannot travel from '{from}' to '{to}'")]
    InvalidTarget { from: String, to: String },
    #[error("action '{action}' is not available on the {screen} screen")]
    InvalidAction {
        action: &'static str,
        screen: &'static str,
    },
    #[error("{kind} '{id}' already exists")]
    Duplicate { kind: &'static str, id: String },
}

impl GameError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_target(from: &str, to: &str) -> Self {
        Self::InvalidTarget {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
