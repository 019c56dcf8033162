//! Player state management.

use cw_core::{ItemId, SceneId, Stats, StoryProgress};

use crate::inventory::Inventory;

/// The player's current state in a game session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Current scene.
    pub scene: SceneId,
    /// Carried and equipped items.
    pub inventory: Inventory,
    /// Current stats, including equipment bonuses.
    pub stats: Stats,
    /// Story-progress flags.
    pub story: StoryProgress,
}

impl PlayerState {
    /// Create a new player in a scene.
    pub fn new(scene: SceneId, stats: Stats) -> Self {
        Self {
            scene,
            inventory: Inventory::new(),
            stats,
            story: StoryProgress::new(),
        }
    }

    /// Whether the player carries or wears an item.
    pub fn has_item(&self, item: &ItemId) -> bool {
        self.inventory.has(item)
    }

    /// Check if a story flag is set and truthy.
    pub fn has_flag(&self, key: &str) -> bool {
        self.story.is_set(key)
    }

    /// True once health has reached zero.
    pub fn is_down(&self) -> bool {
        self.stats.is_down()
    }
}
