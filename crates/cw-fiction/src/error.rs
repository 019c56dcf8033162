//! Error types for the fiction engine.

use cw_core::CoreError;
use cw_mechanics::MechError;
use thiserror::Error;

use crate::inventory::InventoryError;

/// Result type for fiction operations.
pub type FictionResult<T> = Result<T, FictionError>;

/// Coarse grouping of [`FictionError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The named thing does not exist or is not here.
    NotFound,
    /// A name matched several things.
    Ambiguous,
    /// The action is not possible in the current state.
    InvalidPrecondition,
    /// The player's input could not be understood.
    InvalidInput,
}

/// Errors that can occur while playing.
///
/// Every variant is recoverable: the session state is unchanged when one
/// is returned, except for [`FictionError::InputClosed`] which also ends
/// the current prompt loop.
#[derive(Debug, Error)]
pub enum FictionError {
    /// Nothing by that name is here.
    #[error("{}", not_found_message(.kind, .name, .suggestions))]
    NotFound {
        /// What was looked for (`item`, `character`, `exit`).
        kind: &'static str,
        /// The name as typed.
        name: String,
        /// Close names, best first.
        suggestions: Vec<String>,
    },

    /// A scene id is not part of the loaded content.
    #[error("scene not found: {0}")]
    SceneNotFound(String),

    /// A name matched several things.
    #[error("Which {kind} do you mean: {}?", .candidates.join(", "))]
    Ambiguous {
        /// What was looked for.
        kind: &'static str,
        /// Display names of the matches.
        candidates: Vec<String>,
    },

    /// An inventory operation was refused.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// The item cannot be picked up.
    #[error("You can't take the {0}.")]
    CannotTake(String),

    /// The character cannot be fought.
    #[error("{0}")]
    CannotFight(String),

    /// The item does nothing when used.
    #[error("You can't use the {0}.")]
    NotUsable(String),

    /// The command was not understood.
    #[error("I don't understand '{0}'. Type 'help' for a list of commands.")]
    UnknownCommand(String),

    /// A menu answer matched nothing.
    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    /// The input source has no more answers.
    #[error("input closed")]
    InputClosed,

    /// A save game does not fit the loaded content.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// A lookup against the world failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A battle could not be set up.
    #[error(transparent)]
    Mechanics(#[from] MechError),
}

impl FictionError {
    /// Group the error for front ends.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } | Self::SceneNotFound(_) | Self::Core(_) => ErrorClass::NotFound,
            Self::Ambiguous { .. } => ErrorClass::Ambiguous,
            Self::Inventory(_)
            | Self::CannotTake(_)
            | Self::CannotFight(_)
            | Self::NotUsable(_)
            | Self::Mechanics(_) => ErrorClass::InvalidPrecondition,
            Self::UnknownCommand(_)
            | Self::InvalidChoice(_)
            | Self::InputClosed
            | Self::InvalidSnapshot(_) => ErrorClass::InvalidInput,
        }
    }
}

fn not_found_message(kind: &str, name: &str, suggestions: &[String]) -> String {
    let mut msg = format!("You don't see any {kind} called '{name}' here.");
    if !suggestions.is_empty() {
        msg.push_str(&format!(" Did you mean: {}?", suggestions.join(", ")));
    }
    msg
}
