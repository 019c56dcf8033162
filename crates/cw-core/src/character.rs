use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::effect::{Condition, Effect};
use crate::id::{CharacterId, ItemId};
use crate::stats::Stats;

/// How a character responds to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    /// Helpful; cannot be fought.
    Friendly,
    /// Indifferent; can be talked to or fought.
    Neutral,
    /// Unfriendly; can be fought.
    Hostile,
    /// Refuses conversation; can be fought.
    Aggressive,
}

impl CharacterKind {
    /// Whether the player may start a fight with this kind of character.
    pub fn can_fight(self) -> bool {
        !matches!(self, CharacterKind::Friendly)
    }

    /// Whether this kind of character will hold a conversation.
    pub fn will_talk(self) -> bool {
        !matches!(self, CharacterKind::Aggressive)
    }
}

impl fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CharacterKind::Friendly => "friendly",
            CharacterKind::Neutral => "neutral",
            CharacterKind::Hostile => "hostile",
            CharacterKind::Aggressive => "aggressive",
        };
        f.write_str(s)
    }
}

/// One selectable line in a character's dialogue menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueOption {
    /// Stable label; also the menu text when `prompt` is absent.
    pub label: String,
    /// Menu text shown to the player.
    #[serde(default)]
    pub prompt: Option<String>,
    /// What the character says back.
    pub response: String,
    /// The option is only offered while this holds.
    #[serde(default)]
    pub requires: Condition,
    /// Side effects run after the response.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl DialogueOption {
    /// Create an option with no conditions or effects.
    pub fn new(label: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            prompt: None,
            response: response.into(),
            requires: Condition::Always,
            effects: Vec::new(),
        }
    }

    /// Gate the option behind a condition.
    pub fn with_requirement(mut self, condition: Condition) -> Self {
        self.requires = condition;
        self
    }

    /// Add a side effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// The text shown in the menu.
    pub fn menu_text(&self) -> &str {
        self.prompt.as_deref().unwrap_or(&self.label)
    }
}

/// A scripted reaction to being given an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Narration shown when the item is handed over.
    pub text: String,
    /// If set, the player keeps the item after showing it.
    #[serde(default)]
    pub keep_item: bool,
    /// Side effects run after the text.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

/// A person or creature the player can meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Filled in from the content map key.
    #[serde(default)]
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Prose shown when examined.
    #[serde(default)]
    pub description: String,
    /// Disposition; changes during play.
    #[serde(rename = "type")]
    pub kind: CharacterKind,
    /// Combat statistics; `health` changes during play.
    #[serde(default)]
    pub stats: Stats,
    /// Opening line of every conversation.
    #[serde(default)]
    pub greeting: String,
    /// Dialogue menu.
    #[serde(default)]
    pub dialogue: Vec<DialogueOption>,
    /// Reactions keyed `give_<item_id>`.
    #[serde(default)]
    pub interactions: BTreeMap<String, Interaction>,
    /// Loot dropped when defeated.
    #[serde(default)]
    pub inventory: Vec<ItemId>,
    /// Flavor lines shown at random while the character is present.
    #[serde(default)]
    pub random_events: Vec<String>,
}

impl Character {
    /// Create a character with default stats and no dialogue.
    pub fn new(id: impl Into<CharacterId>, name: impl Into<String>, kind: CharacterKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind,
            stats: Stats::default(),
            greeting: String::new(),
            dialogue: Vec::new(),
            interactions: BTreeMap::new(),
            inventory: Vec::new(),
            random_events: Vec::new(),
        }
    }

    /// The interaction-table key for giving an item.
    pub fn give_key(item: &ItemId) -> String {
        format!("give_{item}")
    }

    /// Look up the reaction to being given `item`.
    pub fn interaction_for(&self, item: &ItemId) -> Option<&Interaction> {
        self.interactions.get(&Self::give_key(item))
    }

    /// True once the character has been beaten in combat.
    pub fn is_defeated(&self) -> bool {
        self.stats.is_down()
    }

    /// Whether a fight can be started right now.
    pub fn offers_combat(&self) -> bool {
        self.kind.can_fight() && !self.is_defeated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert!(!CharacterKind::Friendly.can_fight());
        assert!(CharacterKind::Neutral.can_fight());
        assert!(!CharacterKind::Aggressive.will_talk());
        assert!(CharacterKind::Hostile.will_talk());
    }

    #[test]
    fn defeated_character_offers_no_combat() {
        let mut wolf = Character::new("wolf", "Grey Wolf", CharacterKind::Hostile);
        assert!(wolf.offers_combat());
        wolf.stats.health = 0;
        assert!(wolf.is_defeated());
        assert!(!wolf.offers_combat());
    }

    #[test]
    fn interaction_lookup() {
        let json = r#"{
            "name": "Old Hermit",
            "type": "neutral",
            "interactions": {
                "give_fish": {"text": "He eats greedily."}
            }
        }"#;
        let hermit: Character = serde_json::from_str(json).unwrap();
        assert!(hermit.interaction_for(&ItemId::from("fish")).is_some());
        assert!(hermit.interaction_for(&ItemId::from("rock")).is_none());
        assert_eq!(hermit.kind, CharacterKind::Neutral);
    }

    #[test]
    fn option_menu_text_falls_back_to_label() {
        let opt = DialogueOption::new("ask about the wreck", "It sank years ago.");
        assert_eq!(opt.menu_text(), "ask about the wreck");
    }
}
