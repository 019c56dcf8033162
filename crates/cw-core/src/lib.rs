//! Core types for Castaway: items, scenes, characters, and the world model.
//!
//! This crate defines the static content model the engine plays against and
//! the validated loading pass that turns a JSON content document into a
//! [`World`]. It knows nothing about commands or presentation; the
//! `cw-fiction` crate drives a [`World`] through a game session.

/// Characters, dialogue options, and interaction tables.
pub mod character;
/// Raw content documents and load-time validation.
pub mod content;
/// Declarative conditions and side effects attached to content.
pub mod effect;
/// Error types used throughout the crate.
pub mod error;
/// String identifiers for items, scenes, and characters.
pub mod id;
/// Item definitions and their interactive state machines.
pub mod item;
/// The item arena and fuzzy name resolution.
pub mod registry;
/// Scenes and the exits connecting them.
pub mod scene;
/// Player and character statistics.
pub mod stats;
/// Story-progress flags.
pub mod story;
/// The central world model that owns all content.
pub mod world;

/// Re-export character types.
pub use character::{Character, CharacterKind, DialogueOption, Interaction};
/// Re-export content loading types.
pub use content::{Content, ValidationIssue};
/// Re-export condition and effect types.
pub use effect::{Condition, Effect};
/// Re-export error types.
pub use error::{ContentError, CoreError, CoreResult};
/// Re-export identifier types.
pub use id::{CharacterId, ItemId, SceneId};
/// Re-export item types.
pub use item::{Item, ItemState, StateAction, UnlockRequirement};
/// Re-export registry types.
pub use registry::{ItemRegistry, Match};
/// Re-export scene types.
pub use scene::{Exit, Scene};
/// Re-export stat types.
pub use stats::{Stat, StatDelta, Stats};
/// Re-export story types.
pub use story::{FlagValue, StoryProgress};
/// Re-export world model types.
pub use world::World;
