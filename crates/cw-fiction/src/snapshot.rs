//! Save-game snapshots.
//!
//! A [`Snapshot`] captures everything a session can change: where the
//! player is, what they carry, their stats and story flags, and the
//! mutable parts of items, characters, and scenes. All maps are
//! `BTreeMap`s so the serialized form is stable.

use std::collections::BTreeMap;
use std::fmt;

use cw_core::{CharacterId, CharacterKind, ItemId, SceneId, Stats, StoryProgress, World};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FictionError, FictionResult};
use crate::inventory::Inventory;
use crate::io::{InputSource, Presenter};
use crate::session::{GameSession, SessionStatus};

/// Mutable state of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// Current state-machine node.
    pub current_state: String,
    /// Whether the item is locked.
    pub locked: bool,
    /// Whether the item has been repaired.
    pub repaired: bool,
}

/// Mutable state of one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    /// Current disposition.
    pub kind: CharacterKind,
    /// Remaining health.
    pub health: i32,
    /// Loot still held.
    pub inventory: Vec<ItemId>,
}

/// Lock and block flags of one exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitSnapshot {
    /// Whether the exit is locked.
    pub locked: bool,
    /// Whether the exit is blocked.
    pub blocked: bool,
}

/// Mutable state of one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Collectible items lying here.
    pub items: Vec<ItemId>,
    /// Exit flags by door name.
    pub exits: BTreeMap<String, ExitSnapshot>,
}

/// A complete save game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The player's scene.
    pub scene: SceneId,
    /// The player's inventory.
    pub inventory: Inventory,
    /// The player's stats.
    pub stats: Stats,
    /// Story flags.
    pub story: StoryProgress,
    /// Item states.
    pub items: BTreeMap<ItemId, ItemSnapshot>,
    /// Character states.
    pub characters: BTreeMap<CharacterId, CharacterSnapshot>,
    /// Scene states.
    pub scenes: BTreeMap<SceneId, SceneSnapshot>,
    /// Session status.
    pub status: SessionStatus,
}

impl Snapshot {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> FictionResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FictionError::InvalidSnapshot(e.to_string()))
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> FictionResult<Self> {
        serde_json::from_str(json).map_err(|e| FictionError::InvalidSnapshot(e.to_string()))
    }

    /// Check every id against the loaded world.
    fn check(&self, world: &World) -> FictionResult<()> {
        let known_item = |id: &&ItemId| world.items.contains(id.as_str());

        if !world.has_scene(&self.scene) {
            return unknown("scene", &self.scene);
        }
        if let Some(id) = self.inventory.all().find(|id| !known_item(id)) {
            return unknown("item", id);
        }

        for (id, snap) in &self.items {
            let Ok(item) = world.items.get(id.as_str()) else {
                return unknown("item", id);
            };
            if !item.states.is_empty() && !item.states.contains_key(&snap.current_state) {
                return unknown("state", &snap.current_state);
            }
        }

        for (id, snap) in &self.characters {
            if world.character(id).is_err() {
                return unknown("character", id);
            }
            if let Some(loot) = snap.inventory.iter().find(|id| !known_item(id)) {
                return unknown("item", loot);
            }
        }

        for (id, snap) in &self.scenes {
            let Ok(scene) = world.scene(id) else {
                return unknown("scene", id);
            };
            if let Some(item) = snap.items.iter().find(|id| !known_item(id)) {
                return unknown("item", item);
            }
            let door = snap
                .exits
                .keys()
                .find(|door| !scene.exits.iter().any(|e| &e.door_name == *door));
            if let Some(door) = door {
                return unknown("exit", door);
            }
        }
        Ok(())
    }
}

fn unknown(what: &str, id: &dyn fmt::Display) -> FictionResult<()> {
    Err(FictionError::InvalidSnapshot(format!("unknown {what} '{id}'")))
}

impl<P: Presenter, I: InputSource> GameSession<P, I> {
    /// Capture the session's mutable state.
    pub fn snapshot(&self) -> Snapshot {
        let items = self
            .world
            .items
            .iter()
            .map(|item| {
                let snap = ItemSnapshot {
                    current_state: item.current_state.clone(),
                    locked: item.locked,
                    repaired: item.repaired,
                };
                (item.id.clone(), snap)
            })
            .collect();

        let characters = self
            .world
            .characters()
            .map(|c| {
                let snap = CharacterSnapshot {
                    kind: c.kind,
                    health: c.stats.health,
                    inventory: c.inventory.clone(),
                };
                (c.id.clone(), snap)
            })
            .collect();

        let scenes = self
            .world
            .scenes()
            .map(|scene| {
                let exits = scene
                    .exits
                    .iter()
                    .map(|e| {
                        let flags = ExitSnapshot {
                            locked: e.locked,
                            blocked: e.blocked,
                        };
                        (e.door_name.clone(), flags)
                    })
                    .collect();
                let snap = SceneSnapshot {
                    items: scene.items.clone(),
                    exits,
                };
                (scene.id.clone(), snap)
            })
            .collect();

        Snapshot {
            scene: self.player.scene.clone(),
            inventory: self.player.inventory.clone(),
            stats: self.player.stats,
            story: self.player.story.clone(),
            items,
            characters,
            scenes,
            status: self.status,
        }
    }

    /// Replace the session's mutable state with a snapshot.
    ///
    /// Every id is checked first; on failure nothing changes. Entries the
    /// snapshot leaves out keep their current values.
    pub fn restore(&mut self, snapshot: Snapshot) -> FictionResult<()> {
        snapshot.check(&self.world)?;

        for (id, snap) in snapshot.items {
            let item = self.world.items.get_mut(id.as_str())?;
            item.current_state = snap.current_state;
            item.locked = snap.locked;
            item.repaired = snap.repaired;
        }
        for (id, snap) in snapshot.characters {
            let character = self.world.character_mut(&id)?;
            character.kind = snap.kind;
            character.stats.health = snap.health.max(0);
            character.inventory = snap.inventory;
        }
        for (id, snap) in snapshot.scenes {
            let scene = self.world.scene_mut(&id)?;
            scene.items = snap.items;
            for exit in &mut scene.exits {
                if let Some(flags) = snap.exits.get(&exit.door_name) {
                    exit.locked = flags.locked;
                    exit.blocked = flags.blocked;
                }
            }
        }

        self.player.scene = snapshot.scene;
        self.player.inventory = snapshot.inventory;
        self.player.stats = snapshot.stats;
        self.player.story = snapshot.story;
        self.status = snapshot.status;
        info!(scene = %self.player.scene, "restored snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Intent;
    use crate::testing::session;

    #[test]
    fn restore_rewinds_the_world() {
        let mut s = session(&["1"]);
        let saved = s.snapshot();

        s.process("take stick");
        s.execute(Intent::Examine("locker".into())).unwrap();
        s.execute(Intent::Fight("crab".into())).unwrap();
        s.player_mut().stats.strength = 10;
        s.process("go rockfall");
        assert_ne!(s.snapshot(), saved);

        s.restore(saved.clone()).unwrap();
        assert_eq!(s.snapshot(), saved);
        assert_eq!(s.player().scene, SceneId::from("beach"));
        assert!(!s.player().has_item(&ItemId::from("stick")));
        assert_eq!(s.world().items.get("locker").unwrap().current_state, "default");
        let crab = s.world().character(&CharacterId::from("crab")).unwrap();
        assert_eq!(crab.stats.health, 15);
        let beach = s.world().scene(&SceneId::from("beach")).unwrap();
        assert!(beach.exits.iter().all(|e| e.door_name == "jungle path" || e.blocked || e.locked));
    }

    #[test]
    fn json_round_trip_is_stable() {
        let mut s = session(&[]);
        s.process("take stick");
        s.player_mut().story.set("visits", 3_i64);
        let json = s.snapshot().to_json().unwrap();
        let parsed = Snapshot::from_json(&json).unwrap();
        assert_eq!(parsed, s.snapshot());
        assert_eq!(parsed.to_json().unwrap(), json);
        assert!(json.contains("\"visits\": 3"));
    }

    #[test]
    fn rejects_unknown_ids() {
        let mut s = session(&[]);
        let good = s.snapshot();

        let mut bad = good.clone();
        bad.scene = SceneId::from("moon");
        let err = s.restore(bad).unwrap_err();
        assert!(err.to_string().contains("unknown scene 'moon'"));

        let mut bad = good.clone();
        bad.inventory.add(ItemId::from("laser"));
        assert!(s.restore(bad).is_err());

        let mut bad = good.clone();
        if let Some(locker) = bad.items.get_mut(&ItemId::from("locker")) {
            locker.current_state = "melted".into();
        }
        assert!(s.restore(bad).is_err());

        let mut bad = good.clone();
        if let Some(beach) = bad.scenes.get_mut(&SceneId::from("beach")) {
            let flags = ExitSnapshot {
                locked: false,
                blocked: false,
            };
            beach.exits.insert("chimney".into(), flags);
        }
        assert!(s.restore(bad).is_err());

        assert_eq!(s.snapshot(), good);
    }

    #[test]
    fn malformed_json_is_invalid_snapshot() {
        let err = Snapshot::from_json("{\"scene\": 4}").unwrap_err();
        assert!(matches!(err, FictionError::InvalidSnapshot(_)));
    }
}
