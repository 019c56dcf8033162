//! Turn-based combat resolution for Castaway.
//!
//! The [`combat::Battle`] state machine is pure: it takes one player action
//! per round and an RNG, and returns the events that happened. Prompting
//! for actions and applying the outcome to the world is left to the game
//! session in `cw-fiction`.

pub mod combat;
pub mod error;

pub use combat::{Battle, BattleResult, CombatEvent, CombatRules, Combatant, Outcome, PlayerAction};
pub use error::{MechError, MechResult};
