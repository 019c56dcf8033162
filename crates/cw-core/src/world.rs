use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::character::Character;
use crate::content::{Content, ValidationIssue};
use crate::error::{ContentError, CoreError, CoreResult};
use crate::id::{CharacterId, ItemId, SceneId};
use crate::registry::ItemRegistry;
use crate::scene::Scene;
use crate::stats::Stats;

/// The central world model. Owns every scene, item, and character.
///
/// Items live in the [`ItemRegistry`]; scenes and characters refer to them
/// by id only. A `World` is only ever built from content that passed
/// validation, so id lookups that fail indicate a bug or a corrupt
/// snapshot rather than bad content.
#[derive(Debug, Clone)]
pub struct World {
    /// Adventure title.
    pub title: String,
    /// Scene a new game starts in.
    pub start_scene: SceneId,
    /// Player stats at the start of a new game.
    pub initial_stats: Stats,
    /// All items and their mutable state.
    pub items: ItemRegistry,
    scenes: BTreeMap<SceneId, Scene>,
    characters: BTreeMap<CharacterId, Character>,
    story: BTreeMap<String, String>,
    warnings: Vec<ValidationIssue>,
}

impl World {
    /// Validate content and build a world from it.
    pub fn from_content(mut content: Content) -> Result<Self, ContentError> {
        content.assign_ids();
        let warnings = content.validated()?;
        for issue in &warnings {
            warn!(subject = %issue.subject, "{}", issue.message);
        }

        let world = Self {
            title: content.title,
            start_scene: content.start_scene,
            initial_stats: content.player,
            items: ItemRegistry::new(content.items.into_values()),
            scenes: content
                .scenes
                .into_iter()
                .map(|s| (s.id.clone(), s))
                .collect(),
            characters: content.characters,
            story: content.story,
            warnings,
        };
        debug!(
            scenes = world.scenes.len(),
            items = world.items.len(),
            characters = world.characters.len(),
            "world loaded"
        );
        Ok(world)
    }

    /// Parse, validate, and build a world from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Self::from_content(Content::from_json(json)?)
    }

    /// Warnings raised while loading.
    pub fn warnings(&self) -> &[ValidationIssue] {
        &self.warnings
    }

    // -----------------------------------------------------------------------
    // Scenes
    // -----------------------------------------------------------------------

    /// Look up a scene.
    pub fn scene(&self, id: &SceneId) -> CoreResult<&Scene> {
        self.scenes
            .get(id)
            .ok_or_else(|| CoreError::SceneNotFound(id.to_string()))
    }

    /// Look up a scene for mutation.
    pub fn scene_mut(&mut self, id: &SceneId) -> CoreResult<&mut Scene> {
        self.scenes
            .get_mut(id)
            .ok_or_else(|| CoreError::SceneNotFound(id.to_string()))
    }

    /// Whether a scene exists.
    pub fn has_scene(&self, id: &SceneId) -> bool {
        self.scenes.contains_key(id)
    }

    /// Iterate scenes in id order.
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    /// Iterate scenes mutably in id order.
    pub fn scenes_mut(&mut self) -> impl Iterator<Item = &mut Scene> {
        self.scenes.values_mut()
    }

    /// The scene currently holding a collectible item, if any.
    pub fn scene_holding(&self, item: &ItemId) -> Option<&SceneId> {
        self.scenes
            .values()
            .find(|s| s.has_item(item))
            .map(|s| &s.id)
    }

    // -----------------------------------------------------------------------
    // Characters
    // -----------------------------------------------------------------------

    /// Look up a character.
    pub fn character(&self, id: &CharacterId) -> CoreResult<&Character> {
        self.characters
            .get(id)
            .ok_or_else(|| CoreError::CharacterNotFound(id.to_string()))
    }

    /// Look up a character for mutation.
    pub fn character_mut(&mut self, id: &CharacterId) -> CoreResult<&mut Character> {
        self.characters
            .get_mut(id)
            .ok_or_else(|| CoreError::CharacterNotFound(id.to_string()))
    }

    /// Iterate characters in id order.
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    /// Iterate characters mutably in id order.
    pub fn characters_mut(&mut self) -> impl Iterator<Item = &mut Character> {
        self.characters.values_mut()
    }

    // -----------------------------------------------------------------------
    // Story text
    // -----------------------------------------------------------------------

    /// Story text for an event key such as `intro` or `victory_wolf`.
    pub fn story_text(&self, key: &str) -> Option<&str> {
        self.story.get(key).map(String::as_str)
    }
}
