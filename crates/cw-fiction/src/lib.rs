//! Game-state interaction engine for Castaway.
//!
//! A [`GameSession`] owns a loaded [`cw_core::World`] and the player's
//! state, and turns [`Intent`]s into state changes and narration. All
//! output goes through a [`Presenter`] and every prompt through an
//! [`InputSource`], so the engine runs the same under a terminal, a test,
//! or any other front end.

/// Conditions and the side-effect executor.
pub mod choice;
/// Engine configuration.
pub mod config;
/// Conversations, gifts, and fights with characters.
pub mod dialogue;
/// Error types for the fiction engine.
pub mod error;
/// Player inventory.
pub mod inventory;
/// Item state-machine interaction.
pub mod interaction;
/// Presentation and input seams.
pub mod io;
/// Command parsing and name resolution.
pub mod parser;
/// Player state management.
pub mod player;
/// Game session orchestration.
pub mod session;
/// Save-game snapshots.
pub mod snapshot;

pub use config::EngineConfig;
pub use error::{ErrorClass, FictionError, FictionResult};
pub use inventory::{Inventory, InventoryError};
pub use io::{Category, InputSource, Presenter, ScriptedInput, Transcript};
pub use parser::{Intent, parse_intent};
pub use player::PlayerState;
pub use session::{GameSession, SessionStatus};
pub use snapshot::Snapshot;

#[cfg(test)]
mod testing;
