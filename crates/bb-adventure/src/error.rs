//! Error types for the adventure engine.

use bb_store::StoreError;
use thiserror::Error;

/// Result type for adventure operations.
pub type AdventureResult<T> = Result<T, AdventureError>;

/// Errors that can occur while running an adventure operation.
#[derive(Debug, Error)]
pub enum AdventureError {
    /// No player record exists for the id and creation was not implied.
    #[error("no character for user {0}")]
    RecordNotFound(String),

    /// The player does not have enough stamina, even after regeneration.
    #[error("not enough stamina: need {needed}, have {available}")]
    InsufficientStamina {
        /// Stamina the operation costs.
        needed: u32,
        /// Stamina the player has.
        available: u32,
    },

    /// An unknown stat name was given to train.
    #[error("unknown stat: {0} (choose pow or smt)")]
    InvalidStat(String),

    /// The store could not persist the result.
    #[error(transparent)]
    Store(#[from] StoreError),
}
