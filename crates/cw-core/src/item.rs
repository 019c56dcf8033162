use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::ItemId;
use crate::stats::StatDelta;

/// Name of the state every item starts in.
pub const DEFAULT_STATE: &str = "default";

/// The action a state offers when the player interacts with the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateAction {
    /// Open the item, revealing its contents.
    Open,
    /// Unlock the item with a passcode or tool.
    Unlock,
    /// Take the state's reward.
    Take,
    /// Nothing to do; only the description is shown.
    None,
}

/// One node of an item's state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemState {
    /// Shown on every interaction while in this state.
    pub description: String,
    /// What interacting does.
    #[serde(default)]
    pub action: Option<StateAction>,
    /// State entered after the action succeeds.
    #[serde(default)]
    pub next_state: Option<String>,
    /// Item handed over by a `take` action.
    #[serde(default)]
    pub reward: Option<ItemId>,
}

impl ItemState {
    /// A state that only shows a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            action: None,
            next_state: None,
            reward: None,
        }
    }

    /// Set the action and the state it leads to.
    pub fn with_action(mut self, action: StateAction, next_state: impl Into<String>) -> Self {
        self.action = Some(action);
        self.next_state = Some(next_state.into());
        self
    }

    /// Set the reward for a `take` action.
    pub fn with_reward(mut self, reward: impl Into<ItemId>) -> Self {
        self.reward = Some(reward.into());
        self
    }
}

/// What it takes to unlock a locked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UnlockRequirement {
    /// The player must enter the passcode.
    Passcode,
    /// The player must carry this item.
    Item(ItemId),
}

impl From<String> for UnlockRequirement {
    fn from(s: String) -> Self {
        if s == "passcode" {
            UnlockRequirement::Passcode
        } else {
            UnlockRequirement::Item(ItemId::from(s))
        }
    }
}

impl From<UnlockRequirement> for String {
    fn from(req: UnlockRequirement) -> Self {
        match req {
            UnlockRequirement::Passcode => "passcode".to_string(),
            UnlockRequirement::Item(id) => id.as_str().to_string(),
        }
    }
}

/// An item definition together with its mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Filled in from the content map key.
    #[serde(default)]
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Prose shown when examined.
    #[serde(default)]
    pub description: String,
    /// Can be used from the inventory.
    #[serde(default)]
    pub usable: bool,
    /// Has a state machine driven by interaction.
    #[serde(default)]
    pub interactive: bool,
    /// Can be worn or wielded.
    #[serde(default)]
    pub equippable: bool,
    /// Disappears when used.
    #[serde(default)]
    pub consumable: bool,
    /// Can be repaired with `repair_item`.
    #[serde(default)]
    pub repairable: bool,
    /// Stat changes applied on use or equip.
    #[serde(default)]
    pub effect: StatDelta,
    /// Interactive state machine.
    #[serde(default)]
    pub states: BTreeMap<String, ItemState>,
    /// Current node of `states`.
    #[serde(default = "default_state")]
    pub current_state: String,
    /// Whether `open` is refused.
    #[serde(default)]
    pub locked: bool,
    /// What unlocks the item.
    #[serde(default)]
    pub unlock_required_item: Option<UnlockRequirement>,
    /// Items revealed into the scene when opened.
    #[serde(default)]
    pub contents: Vec<ItemId>,
    /// Ingredients combined or crafted into this item.
    #[serde(default)]
    pub components: Vec<ItemId>,
    /// Item consumed to repair this one.
    #[serde(default)]
    pub repair_item: Option<ItemId>,
    /// Set once repaired.
    #[serde(default)]
    pub repaired: bool,
}

fn default_state() -> String {
    DEFAULT_STATE.to_string()
}

impl Item {
    /// Create a plain item with no flags.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            usable: false,
            interactive: false,
            equippable: false,
            consumable: false,
            repairable: false,
            effect: StatDelta::new(),
            states: BTreeMap::new(),
            current_state: default_state(),
            locked: false,
            unlock_required_item: None,
            contents: Vec::new(),
            components: Vec::new(),
            repair_item: None,
            repaired: false,
        }
    }

    /// The state the item is currently in, if it has a state machine.
    pub fn state(&self) -> Option<&ItemState> {
        self.states.get(&self.current_state)
    }

    /// Whether this item is the product of combining exactly `a` and `b`.
    pub fn is_recipe_for(&self, a: &ItemId, b: &ItemId) -> bool {
        match self.components.as_slice() {
            [x, y] => (x == a && y == b) || (x == b && y == a),
            _ => false,
        }
    }

    /// The name's last word, lower-cased, used for fuzzy matching.
    pub fn last_word(&self) -> String {
        self.name
            .split_whitespace()
            .last()
            .unwrap_or_default()
            .to_lowercase()
    }
}
