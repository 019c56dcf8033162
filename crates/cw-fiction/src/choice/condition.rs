//! Condition evaluation.

use cw_core::Condition;

use crate::player::PlayerState;

/// Evaluate a condition against the player's current state.
pub fn evaluate(condition: &Condition, player: &PlayerState) -> bool {
    match condition {
        Condition::Always => true,
        Condition::Flag { key } => player.has_flag(key),
        Condition::HasItem { item } => player.has_item(item),
        Condition::StatAtLeast { stat, value } => player.stats.get(*stat) >= *value,
        Condition::Not { condition } => !evaluate(condition, player),
        Condition::All { conditions } => conditions.iter().all(|c| evaluate(c, player)),
        Condition::Any { conditions } => conditions.iter().any(|c| evaluate(c, player)),
    }
}
