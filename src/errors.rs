//! Error types shared across the engine.
//!
//! Every failure the engine reports is recoverable by design: callers are
//! expected to check or catch and react. During battle resolution these are
//! additionally caught at the turn boundary and downgraded to a textual
//! failure outcome so one bad action never aborts an in-progress fight.

use thiserror::Error;

/// Error type for all engine operations.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Invalid action '{action}': {reason}")]
    InvalidAction { action: String, reason: String },

    #[error("Inventory is full: cannot add '{item}' (capacity {capacity})")]
    InventoryFull { item: String, capacity: usize },

    #[error("Item not found: '{item}'")]
    ItemNotFound { item: String },

    #[error("Not enough gold: have {current}, need {required}")]
    InsufficientGold { current: u32, required: u32 },

    #[error("Not enough {resource}: have {current}, need {required}")]
    InsufficientResource {
        resource: &'static str,
        current: u32,
        required: u32,
    },
}

impl GameError {
    /// Shorthand for the most common structural-misuse error.
    pub fn invalid_action(action: impl Into<String>, reason: impl Into<String>) -> GameError {
        GameError::InvalidAction {
            action: action.into(),
            reason: reason.into(),
        }
    }
}
