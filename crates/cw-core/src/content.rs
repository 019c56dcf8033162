//! Raw content documents and load-time validation.
//!
//! A [`Content`] document is deserialized straight into typed records and
//! then cross-checked: every id a scene, exit, item, or character mentions
//! must exist, and every item must have at most one starting location.
//! Problems are collected rather than reported one at a time.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::effect::Effect;
use crate::error::ContentError;
use crate::id::{CharacterId, ItemId, SceneId};
use crate::item::{DEFAULT_STATE, Item, StateAction, UnlockRequirement};
use crate::scene::Scene;
use crate::stats::Stats;

/// The static seed data for one adventure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Adventure title.
    #[serde(default)]
    pub title: String,
    /// Scene the player starts in.
    pub start_scene: SceneId,
    /// Starting player stats.
    #[serde(default)]
    pub player: Stats,
    /// Every scene.
    pub scenes: Vec<Scene>,
    /// Item catalog keyed by id.
    #[serde(default)]
    pub items: BTreeMap<ItemId, Item>,
    /// Characters keyed by id.
    #[serde(default)]
    pub characters: BTreeMap<CharacterId, Character>,
    /// Story text keyed by event (e.g. `intro`).
    #[serde(default)]
    pub story: BTreeMap<String, String>,
}

/// A problem found while validating content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Where the problem was found, e.g. `scene 'beach'`.
    pub subject: String,
    /// What is wrong.
    pub message: String,
    /// Errors abort loading; warnings are only reported.
    pub is_error: bool,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.subject, self.message)
    }
}

impl Content {
    /// Parse a JSON content document. Does not validate references.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let mut content: Content = serde_json::from_str(json)?;
        content.assign_ids();
        Ok(content)
    }

    /// Copy map keys into the `id` fields of items and characters.
    pub fn assign_ids(&mut self) {
        for (id, item) in &mut self.items {
            item.id = id.clone();
        }
        for (id, character) in &mut self.characters {
            character.id = id.clone();
        }
    }

    /// Check cross-references. Returns every issue found, errors and
    /// warnings alike.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut v = Validator::new(self);
        v.check_scenes();
        v.check_item_locations();
        v.check_items();
        v.check_characters();
        v.check_recipes();
        v.issues
    }

    /// Validate, failing on any error. Returns the warnings.
    pub fn validated(&self) -> Result<Vec<ValidationIssue>, ContentError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(|i| i.is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ContentError::Invalid(
                errors.iter().map(ToString::to_string).collect(),
            ))
        }
    }
}

struct Validator<'a> {
    content: &'a Content,
    issues: Vec<ValidationIssue>,
}

impl<'a> Validator<'a> {
    fn new(content: &'a Content) -> Self {
        Self {
            content,
            issues: Vec::new(),
        }
    }

    fn error(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            subject: subject.into(),
            message: message.into(),
            is_error: true,
        });
    }

    fn warning(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            subject: subject.into(),
            message: message.into(),
            is_error: false,
        });
    }

    fn has_item(&self, id: &ItemId) -> bool {
        self.content.items.contains_key(id)
    }

    fn has_scene(&self, id: &SceneId) -> bool {
        self.content.scenes.iter().any(|s| &s.id == id)
    }

    fn require_item(&mut self, subject: &str, id: &ItemId, role: &str) {
        if !self.has_item(id) {
            self.error(subject, format!("{role} references unknown item '{id}'"));
        }
    }

    fn check_effects(&mut self, subject: &str, effects: &[Effect]) {
        for effect in effects {
            if let Some(item) = effect.referenced_item() {
                self.require_item(subject, item, "effect");
            }
            let unknown = effect
                .referenced_character()
                .filter(|c| !self.content.characters.contains_key(*c));
            if let Some(character) = unknown {
                self.error(
                    subject,
                    format!("effect references unknown character '{character}'"),
                );
            }
        }
    }

    fn check_scenes(&mut self) {
        let content = self.content;
        if !self.has_scene(&content.start_scene) {
            self.error(
                "content",
                format!("start scene '{}' does not exist", content.start_scene),
            );
        }

        let mut seen: HashMap<&SceneId, usize> = HashMap::new();
        for scene in &content.scenes {
            *seen.entry(&scene.id).or_default() += 1;
        }
        for (id, count) in seen {
            if count > 1 {
                self.error(format!("scene '{id}'"), format!("defined {count} times"));
            }
        }

        for scene in &content.scenes {
            let subject = format!("scene '{}'", scene.id);
            for item in scene.interactable_items() {
                self.require_item(&subject, item, "item list");
            }
            for character in &scene.characters {
                if !content.characters.contains_key(character) {
                    self.error(&subject, format!("unknown character '{character}'"));
                }
            }
            let mut doors: HashMap<String, usize> = HashMap::new();
            for exit in &scene.exits {
                *doors.entry(exit.door_name.to_lowercase()).or_default() += 1;
            }
            let mut repeated: Vec<_> = doors.into_iter().filter(|(_, n)| *n > 1).collect();
            repeated.sort();
            for (door, count) in repeated {
                self.error(&subject, format!("door '{door}' defined {count} times"));
            }

            for exit in &scene.exits {
                let exit_subject = format!("{subject} exit '{}'", exit.door_name);
                if !self.has_scene(&exit.scene_id) {
                    self.error(
                        &exit_subject,
                        format!("leads to unknown scene '{}'", exit.scene_id),
                    );
                }
                if exit.locked {
                    match &exit.required_item {
                        Some(item) => self.require_item(&exit_subject, item, "lock"),
                        None => self.error(&exit_subject, "locked without a required_item"),
                    }
                }
                if exit.blocked {
                    let by_stat = exit.required_stat.is_some() && exit.required_value.is_some();
                    if exit.required_condition.is_none() && !by_stat {
                        self.error(
                            &exit_subject,
                            "blocked without a required_condition or required_stat/required_value",
                        );
                    }
                }
            }
        }
    }

    /// An item may start in at most one place: one scene list, one
    /// character's loot, one container, or the output of one recipe.
    fn check_item_locations(&mut self) {
        let content = self.content;
        let mut homes: BTreeMap<&ItemId, Vec<String>> = BTreeMap::new();
        for item in content.items.values() {
            if !item.components.is_empty() {
                homes
                    .entry(&item.id)
                    .or_default()
                    .push("crafted from a recipe".to_string());
            }
            for inside in &item.contents {
                homes
                    .entry(inside)
                    .or_default()
                    .push(format!("contents of '{}'", item.id));
            }
        }
        for scene in &content.scenes {
            for item in scene.interactable_items() {
                homes
                    .entry(item)
                    .or_default()
                    .push(format!("scene '{}'", scene.id));
            }
        }
        for character in content.characters.values() {
            for item in &character.inventory {
                homes
                    .entry(item)
                    .or_default()
                    .push(format!("character '{}'", character.id));
            }
        }
        for (item, places) in homes {
            if places.len() > 1 {
                self.error(
                    format!("item '{item}'"),
                    format!("placed in several locations: {}", places.join(", ")),
                );
            }
        }
    }

    fn check_items(&mut self) {
        let content = self.content;
        for item in content.items.values() {
            let subject = format!("item '{}'", item.id);

            for id in item.contents.iter().chain(item.components.iter()) {
                self.require_item(&subject, id, "contents/components");
            }
            if let Some(tool) = &item.repair_item {
                self.require_item(&subject, tool, "repair_item");
            }
            if item.repairable && item.repair_item.is_none() {
                self.error(&subject, "repairable without a repair_item");
            }
            if let Some(UnlockRequirement::Item(tool)) = &item.unlock_required_item {
                self.require_item(&subject, tool, "unlock_required_item");
            }

            if item.states.is_empty() {
                if item.interactive {
                    self.warning(&subject, "interactive but has no states");
                }
                continue;
            }
            if !item.states.contains_key(&item.current_state) {
                self.error(
                    &subject,
                    format!("current state '{}' is not defined", item.current_state),
                );
            }
            if item.current_state != DEFAULT_STATE && !item.states.contains_key(DEFAULT_STATE) {
                self.warning(&subject, "has no 'default' state");
            }
            for (name, state) in &item.states {
                let state_subject = format!("{subject} state '{name}'");
                let dangling = state
                    .next_state
                    .as_ref()
                    .filter(|next| !item.states.contains_key(next.as_str()));
                if let Some(next) = dangling {
                    self.error(&state_subject, format!("next_state '{next}' is not defined"));
                }
                if let Some(reward) = &state.reward {
                    self.require_item(&state_subject, reward, "reward");
                }
                match state.action {
                    Some(StateAction::Take) if state.reward.is_none() => {
                        self.error(&state_subject, "take action without a reward");
                    }
                    Some(StateAction::Open | StateAction::Unlock | StateAction::Take)
                        if state.next_state.is_none() =>
                    {
                        self.error(&state_subject, "action without a next_state");
                    }
                    _ => {}
                }
            }
        }
    }

    fn check_characters(&mut self) {
        let content = self.content;
        for character in content.characters.values() {
            let subject = format!("character '{}'", character.id);
            for loot in &character.inventory {
                self.require_item(&subject, loot, "inventory");
            }
            for option in &character.dialogue {
                let option_subject = format!("{subject} option '{}'", option.label);
                for item in option.requires.referenced_items() {
                    self.require_item(&option_subject, item, "condition");
                }
                self.check_effects(&option_subject, &option.effects);
            }
            for (key, interaction) in &character.interactions {
                let interaction_subject = format!("{subject} interaction '{key}'");
                match key.strip_prefix("give_") {
                    Some(item) => {
                        let item = ItemId::from(item);
                        self.require_item(&interaction_subject, &item, "key");
                    }
                    None => self.error(&interaction_subject, "key must start with 'give_'"),
                }
                self.check_effects(&interaction_subject, &interaction.effects);
            }
        }
    }

    fn check_recipes(&mut self) {
        let content = self.content;
        let mut by_pair: BTreeMap<(ItemId, ItemId), Vec<&ItemId>> = BTreeMap::new();
        for item in content.items.values() {
            if let [a, b] = item.components.as_slice() {
                let key = if a <= b {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                };
                by_pair.entry(key).or_default().push(&item.id);
            }
        }
        for ((a, b), products) in by_pair {
            if products.len() > 1 {
                let names: Vec<&str> = products.iter().map(|p| p.as_str()).collect();
                self.warning(
                    format!("recipe '{a}' + '{b}'"),
                    format!(
                        "produces several items ({}); the first by id wins",
                        names.join(", ")
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "start_scene": "beach",
        "scenes": [
            {"id": "beach", "items": ["stick"], "exits": [{"door_name": "path", "scene_id": "jungle"}]},
            {"id": "jungle"}
        ],
        "items": {"stick": {"name": "Stick"}}
    }"#;

    #[test]
    fn minimal_content_is_valid() {
        let content = Content::from_json(MINIMAL).unwrap();
        assert!(content.validated().unwrap().is_empty());
        assert_eq!(content.items[&ItemId::from("stick")].id, "stick");
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let err = Content::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ContentError::Parse(_)));
    }

    #[test]
    fn dangling_references_are_collected() {
        let content = Content::from_json(
            r#"{
            "start_scene": "nowhere",
            "scenes": [
                {"id": "beach", "items": ["ghost"], "characters": ["nobody"],
                 "exits": [{"door_name": "door", "scene_id": "void", "locked": true}]}
            ]
        }"#,
        )
        .unwrap();

        let issues = content.validate();
        let errors: Vec<_> = issues.iter().filter(|i| i.is_error).collect();
        assert_eq!(errors.len(), 5);
        assert!(matches!(
            content.validated(),
            Err(ContentError::Invalid(list)) if list.len() == 5
        ));
    }

    #[test]
    fn item_in_two_places_is_an_error() {
        let content = Content::from_json(
            r#"{
            "start_scene": "a",
            "scenes": [{"id": "a", "items": ["coin"]}, {"id": "b", "items": ["coin"]}],
            "items": {"coin": {"name": "Coin"}}
        }"#,
        )
        .unwrap();
        let issues = content.validate();
        assert!(issues.iter().any(|i| i.message.contains("several locations")));
    }

    #[test]
    fn placed_recipe_product_is_an_error() {
        let content = Content::from_json(
            r#"{
            "start_scene": "a",
            "scenes": [{"id": "a", "items": ["stick", "stone", "axe"]}],
            "items": {
                "stick": {"name": "Stick"},
                "stone": {"name": "Stone"},
                "axe": {"name": "Axe", "components": ["stick", "stone"]}
            }
        }"#,
        )
        .unwrap();
        let errors: Vec<String> = content
            .validate()
            .into_iter()
            .filter(|i| i.is_error)
            .map(|i| i.message)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("crafted from a recipe"));
        assert!(errors[0].contains("scene 'a'"));
    }

    #[test]
    fn container_contents_placed_elsewhere_is_an_error() {
        let content = Content::from_json(
            r#"{
            "start_scene": "a",
            "scenes": [{"id": "a", "items": ["key"], "passive_items": ["box"]}],
            "items": {
                "key": {"name": "Key"},
                "box": {"name": "Box", "contents": ["key"]}
            }
        }"#,
        )
        .unwrap();
        assert!(matches!(
            content.validated(),
            Err(ContentError::Invalid(list)) if list.len() == 1
        ));
    }

    #[test]
    fn broken_state_machine() {
        let content = Content::from_json(
            r#"{
            "start_scene": "a",
            "scenes": [{"id": "a", "passive_items": ["locker"]}],
            "items": {"locker": {
                "name": "Locker",
                "interactive": true,
                "states": {
                    "default": {"description": "A locker.", "action": "open", "next_state": "opne"},
                    "shelf": {"description": "A shelf.", "action": "take", "next_state": "default"}
                }
            }}
        }"#,
        )
        .unwrap();
        let errors: Vec<String> = content
            .validate()
            .into_iter()
            .filter(|i| i.is_error)
            .map(|i| i.message)
            .collect();
        assert!(errors.iter().any(|m| m.contains("next_state 'opne'")));
        assert!(errors.iter().any(|m| m.contains("without a reward")));
    }

    #[test]
    fn overlapping_recipes_warn() {
        let content = Content::from_json(
            r#"{
            "start_scene": "a",
            "scenes": [{"id": "a"}],
            "items": {
                "stick": {"name": "Stick"},
                "stone": {"name": "Stone"},
                "axe": {"name": "Axe", "components": ["stick", "stone"]},
                "hammer": {"name": "Hammer", "components": ["stone", "stick"]}
            }
        }"#,
        )
        .unwrap();
        let warnings = content.validated().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("axe, hammer"));
    }

    #[test]
    fn repeated_door_names_are_an_error() {
        let content = Content::from_json(
            r#"{
            "start_scene": "a",
            "scenes": [
                {"id": "a", "exits": [{"door_name": "Gate", "scene_id": "b"},
                                       {"door_name": "gate", "scene_id": "c"}]},
                {"id": "b", "exits": [{"door_name": "gate", "scene_id": "a"}]},
                {"id": "c"}
            ]
        }"#,
        )
        .unwrap();
        let errors: Vec<String> = content
            .validate()
            .into_iter()
            .filter(|i| i.is_error)
            .map(|i| i.message)
            .collect();
        assert_eq!(errors, vec!["door 'gate' defined 2 times".to_string()]);
    }

    #[test]
    fn blocked_exit_needs_a_predicate() {
        let content = Content::from_json(
            r#"{
            "start_scene": "a",
            "scenes": [
                {"id": "a", "exits": [{"door_name": "rockfall", "scene_id": "b", "blocked": true,
                                        "required_stat": "strength"}]},
                {"id": "b"}
            ]
        }"#,
        )
        .unwrap();
        assert!(content.validated().is_err());
    }
}
