//! Errors reported by the rule engine and the notation parser.

use thiserror::Error;

/// Every fallible engine entry point reports one of these. None of them are
/// transient: the same input in the same position always fails the same way,
/// and a failed operation never changes the game.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The input does not match the expected grammar (move notation, square,
    /// file, rank or piece symbol).
    #[error("can not parse '{input}': {reason}")]
    Parse {
        /// Offending input.
        input: String,
        /// What exactly is wrong with it.
        reason: String,
    },

    /// The input is well-formed but does not identify exactly one legal move
    /// in the current position.
    #[error("illegal move '{input}': {reason}")]
    IllegalMove {
        /// Move as it was given by the caller.
        input: String,
        /// Whether no move or several moves matched.
        reason: String,
    },

    /// The operation is not allowed in the current state: promotion choice
    /// does not match the move or the game is already over.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Coordinates are outside of the board.
    #[error("coordinates (row {row}, column {column}) are outside of the board")]
    OutOfBounds {
        #[allow(missing_docs)]
        row: u8,
        #[allow(missing_docs)]
        column: u8,
    },
}

impl Error {
    pub(crate) fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn illegal(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IllegalMove {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Result type of the engine entry points.
pub type Result<T> = std::result::Result<T, Error>;
