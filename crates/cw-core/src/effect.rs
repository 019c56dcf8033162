//! Declarative conditions and side effects.
//!
//! Content attaches these to dialogue options and item interactions. They
//! are plain data here; the fiction engine evaluates conditions and runs
//! effects against the live session.

use serde::{Deserialize, Serialize};

use crate::character::CharacterKind;
use crate::id::{CharacterId, ItemId};
use crate::stats::Stat;
use crate::story::FlagValue;

/// A predicate over player and story state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum Condition {
    /// Always true.
    #[default]
    Always,
    /// A story flag is set and truthy.
    Flag {
        /// Flag key.
        key: String,
    },
    /// The player carries or wears an item.
    HasItem {
        /// Item id.
        item: ItemId,
    },
    /// A player stat is at least `value`.
    StatAtLeast {
        /// The stat to compare.
        stat: Stat,
        /// Inclusive threshold.
        value: i32,
    },
    /// Logical NOT.
    Not {
        /// The negated condition.
        condition: Box<Condition>,
    },
    /// Logical AND.
    All {
        /// Every one of these must hold.
        conditions: Vec<Condition>,
    },
    /// Logical OR.
    Any {
        /// At least one of these must hold.
        conditions: Vec<Condition>,
    },
}

impl Condition {
    /// Condition on a single story flag.
    pub fn flag(key: impl Into<String>) -> Self {
        Condition::Flag { key: key.into() }
    }

    /// Item ids this condition refers to.
    pub fn referenced_items(&self) -> Vec<&ItemId> {
        match self {
            Condition::HasItem { item } => vec![item],
            Condition::Not { condition } => condition.referenced_items(),
            Condition::All { conditions } | Condition::Any { conditions } => conditions
                .iter()
                .flat_map(Condition::referenced_items)
                .collect(),
            Condition::Always | Condition::Flag { .. } | Condition::StatAtLeast { .. } => {
                Vec::new()
            }
        }
    }
}

/// A side effect triggered by a dialogue option or an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Record a story-progress flag.
    SetFlag {
        /// Flag key.
        key: String,
        /// Value to store (defaults to `true`).
        #[serde(default)]
        value: FlagValue,
    },
    /// Change a character's disposition.
    Reclassify {
        /// The character to change.
        character: CharacterId,
        /// Its new type.
        kind: CharacterKind,
    },
    /// Remove an item from the player's inventory.
    ConsumeItem {
        /// Item id.
        item: ItemId,
    },
    /// Put an item into the player's inventory.
    GiveItem {
        /// Item id.
        item: ItemId,
    },
    /// Place an item into the current scene.
    RevealItem {
        /// Item id.
        item: ItemId,
    },
    /// Change a player stat.
    AdjustStat {
        /// The stat to change.
        stat: Stat,
        /// Amount added (may be negative).
        delta: i32,
    },
    /// Repair an item using its repair tool.
    RepairItem {
        /// Item id.
        item: ItemId,
    },
    /// Extra narration.
    Say {
        /// Text to report.
        text: String,
    },
}

impl Effect {
    /// Set a boolean story flag.
    pub fn set_flag(key: impl Into<String>) -> Self {
        Effect::SetFlag {
            key: key.into(),
            value: FlagValue::Bool(true),
        }
    }

    /// The item this effect refers to, if any.
    pub fn referenced_item(&self) -> Option<&ItemId> {
        match self {
            Effect::ConsumeItem { item }
            | Effect::GiveItem { item }
            | Effect::RevealItem { item }
            | Effect::RepairItem { item } => Some(item),
            _ => None,
        }
    }

    /// The character this effect refers to, if any.
    pub fn referenced_character(&self) -> Option<&CharacterId> {
        match self {
            Effect::Reclassify { character, .. } => Some(character),
            _ => None,
        }
    }
}
