//! Conditions and side effects.
//!
//! Content describes both as data (see [`cw_core::Condition`] and
//! [`cw_core::Effect`]); this module evaluates and executes them against
//! the live world and player.

mod condition;
mod effect;

pub use condition::evaluate;
pub use effect::{apply_effects, check_effects};
