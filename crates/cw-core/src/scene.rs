use serde::{Deserialize, Serialize};

use crate::id::{CharacterId, ItemId, SceneId};
use crate::stats::{Stat, Stats};
use crate::story::StoryProgress;

/// A directed edge from one scene to another, optionally gated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exit {
    /// Name the player uses to pick this exit.
    pub door_name: String,
    /// Destination scene.
    pub scene_id: SceneId,
    /// Whether an item is currently required.
    #[serde(default)]
    pub locked: bool,
    /// Item that opens the lock.
    #[serde(default)]
    pub required_item: Option<ItemId>,
    /// Whether the item is used up by unlocking.
    #[serde(default)]
    pub consumable: bool,
    /// Shown when the player lacks the item.
    #[serde(default)]
    pub lock_text: Option<String>,
    /// Shown when the lock opens.
    #[serde(default)]
    pub unlock_text: Option<String>,
    /// Whether a condition is currently required.
    #[serde(default)]
    pub blocked: bool,
    /// Story flag that clears the block.
    #[serde(default)]
    pub required_condition: Option<String>,
    /// Stat that clears the block.
    #[serde(default)]
    pub required_stat: Option<Stat>,
    /// Threshold for `required_stat`.
    #[serde(default)]
    pub required_value: Option<i32>,
    /// Shown while blocked.
    #[serde(default)]
    pub block_text: Option<String>,
    /// Shown when the block clears.
    #[serde(default)]
    pub unblock_text: Option<String>,
}

impl Exit {
    /// An ungated exit.
    pub fn new(door_name: impl Into<String>, scene_id: impl Into<SceneId>) -> Self {
        Self {
            door_name: door_name.into(),
            scene_id: scene_id.into(),
            locked: false,
            required_item: None,
            consumable: false,
            lock_text: None,
            unlock_text: None,
            blocked: false,
            required_condition: None,
            required_stat: None,
            required_value: None,
            block_text: None,
            unblock_text: None,
        }
    }

    /// Lock the exit behind an item.
    pub fn locked_by(mut self, item: impl Into<ItemId>, consumable: bool) -> Self {
        self.locked = true;
        self.required_item = Some(item.into());
        self.consumable = consumable;
        self
    }

    /// Block the exit until a story flag is set.
    pub fn blocked_until(mut self, flag: impl Into<String>) -> Self {
        self.blocked = true;
        self.required_condition = Some(flag.into());
        self
    }

    /// Block the exit until a stat reaches a threshold.
    pub fn blocked_by_stat(mut self, stat: Stat, value: i32) -> Self {
        self.blocked = true;
        self.required_stat = Some(stat);
        self.required_value = Some(value);
        self
    }

    /// Whether the block predicate is satisfied: the condition flag is set,
    /// or the stat meets its threshold.
    pub fn block_cleared_by(&self, stats: &Stats, story: &StoryProgress) -> bool {
        let by_flag = self
            .required_condition
            .as_deref()
            .is_some_and(|flag| story.is_set(flag));
        let by_stat = match (self.required_stat, self.required_value) {
            (Some(stat), Some(value)) => stats.get(stat) >= value,
            _ => false,
        };
        by_flag || by_stat
    }

    /// Text shown while blocked.
    pub fn block_message(&self) -> String {
        self.block_text
            .clone()
            .unwrap_or_else(|| format!("The way through the {} is blocked.", self.door_name))
    }

    /// Text shown while locked.
    pub fn lock_message(&self) -> String {
        self.lock_text
            .clone()
            .unwrap_or_else(|| format!("The {} is locked.", self.door_name))
    }
}

/// A navigable location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Unique scene id.
    pub id: SceneId,
    /// Display name (falls back to the id).
    #[serde(default)]
    pub name: String,
    /// Prose shown on arrival and when exploring.
    #[serde(default)]
    pub description: String,
    /// Collectible items lying here.
    #[serde(default)]
    pub items: Vec<ItemId>,
    /// Fixtures the player can interact with but not pick up.
    #[serde(default)]
    pub passive_items: Vec<ItemId>,
    /// Characters present.
    #[serde(default)]
    pub characters: Vec<CharacterId>,
    /// Ways out.
    #[serde(default)]
    pub exits: Vec<Exit>,
    /// Music cue played on entry.
    #[serde(default)]
    pub music: Option<String>,
    /// Sound effect played on entry.
    #[serde(default)]
    pub sound_effect: Option<String>,
    /// Hint offered on request.
    #[serde(default)]
    pub hint: Option<String>,
    /// Flavor lines shown at random while exploring.
    #[serde(default)]
    pub random_events: Vec<String>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(id: impl Into<SceneId>, description: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.as_str().replace('_', " "),
            id,
            description: description.into(),
            items: Vec::new(),
            passive_items: Vec::new(),
            characters: Vec::new(),
            exits: Vec::new(),
            music: None,
            sound_effect: None,
            hint: None,
            random_events: Vec::new(),
        }
    }

    /// Display name.
    pub fn title(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }

    /// Whether a collectible item lies here.
    pub fn has_item(&self, item: &ItemId) -> bool {
        self.items.contains(item)
    }

    /// Add a collectible item, keeping the list free of duplicates.
    pub fn add_item(&mut self, item: ItemId) {
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    /// Remove a collectible item. Returns false if it was not here.
    pub fn remove_item(&mut self, item: &ItemId) -> bool {
        if let Some(pos) = self.items.iter().position(|i| i == item) {
            self.items.remove(pos);
            true
        } else {
            false
        }
    }

    /// Items the player can interact with: collectibles then fixtures.
    pub fn interactable_items(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter().chain(self.passive_items.iter())
    }
}
