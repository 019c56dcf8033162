//! Game session orchestration.
//!
//! [`GameSession`] owns the world, the player, and the I/O seams, and is
//! the only thing that mutates them. Each [`Intent`] is resolved completely
//! before the next one; the session only waits inside
//! [`InputSource::request_input`].

use cw_core::{ItemId, Match, Scene, SceneId, StatDelta, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ErrorClass, FictionError, FictionResult};
use crate::inventory::InventoryError;
use crate::io::{Category, InputSource, Presenter};
use crate::parser::{Intent, NameMatch, parse_intent, resolve_name};
use crate::player::PlayerState;

/// Shown when `examine` finds nothing.
const NOTHING_HERE: &[&str] = &[
    "You search around but find nothing like that.",
    "There's no such thing here.",
    "You look around, but it isn't here.",
    "Nothing by that name catches your eye.",
];

const HELP: &str = "\
Commands:
  look                     describe the surroundings
  examine <thing>          look at or interact with something
  take <item> / drop <item>
  use <item>               use an item from your inventory
  equip <item> / unequip <item>
  combine <item> with <item>
  craft <item>             build an item from its parts
  repair <item>
  give <item> to <someone>
  talk to <someone>
  fight <someone>
  go <exit>
  inventory, stats, hint, help, quit";

/// Whether the game is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Accepting commands.
    Playing,
    /// The player was defeated.
    Lost,
    /// The player quit.
    Quit,
}

/// An interactive game session.
pub struct GameSession<P: Presenter, I: InputSource> {
    pub(crate) world: World,
    pub(crate) player: PlayerState,
    pub(crate) config: EngineConfig,
    pub(crate) rng: StdRng,
    pub(crate) presenter: P,
    pub(crate) input: I,
    pub(crate) status: SessionStatus,
}

impl<P: Presenter, I: InputSource> GameSession<P, I> {
    /// Create a session with the player in the world's start scene.
    pub fn new(world: World, config: EngineConfig, presenter: P, input: I) -> Self {
        let player = PlayerState::new(world.start_scene.clone(), world.initial_stats);
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            world,
            player,
            config,
            presenter,
            input,
            status: SessionStatus::Playing,
        }
    }

    /// Show the intro and enter the start scene.
    pub fn start(&mut self) -> FictionResult<()> {
        if let Some(intro) = self.world.story_text("intro").map(str::to_string) {
            self.say(Category::Narration, intro);
        }
        let start = self.world.start_scene.clone();
        self.change_scene(&start)
    }

    /// Get the world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get the player state.
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Get a mutable reference to the player state.
    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    /// Get the presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Get a mutable reference to the presenter.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Get a mutable reference to the input source.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Get the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// True once the game has ended.
    pub fn is_over(&self) -> bool {
        self.status != SessionStatus::Playing
    }

    /// Parse and handle a line of player input.
    pub fn process(&mut self, line: &str) -> Option<ErrorClass> {
        self.handle(parse_intent(line))
    }

    /// Execute an intent, reporting any error to the presenter.
    pub fn handle(&mut self, intent: Intent) -> Option<ErrorClass> {
        match self.execute(intent) {
            Ok(()) => None,
            Err(err) => {
                debug!(error = %err, "command failed");
                self.say(Category::System, err.to_string());
                Some(err.class())
            }
        }
    }

    /// Execute an intent.
    pub fn execute(&mut self, intent: Intent) -> FictionResult<()> {
        let always_allowed = matches!(intent, Intent::Help | Intent::Stats | Intent::Inventory);
        if self.is_over() && !always_allowed {
            self.say(Category::System, "The game is over.");
            return Ok(());
        }
        debug!(?intent, "executing");
        match intent {
            Intent::Explore => self.explore(),
            Intent::Examine(name) => self.interact_with_item(&name),
            Intent::Take(name) => self.take(&name),
            Intent::Drop(name) => self.drop_item(&name),
            Intent::Give { item, character } => self.give_item_to(&item, &character),
            Intent::Fight(name) => self.fight(&name),
            Intent::Exit(door) => self.attempt_exit(&door),
            Intent::Use(name) => self.use_item(&name),
            Intent::Equip(name) => self.equip(&name),
            Intent::Unequip(name) => self.unequip(&name),
            Intent::Talk(name) => self.talk_to(&name),
            Intent::Combine(a, b) => self.combine(&a, &b),
            Intent::Craft(name) => self.craft(&name),
            Intent::Repair(name) => self.repair(&name),
            Intent::Inventory => {
                self.show_inventory();
                Ok(())
            }
            Intent::Stats => {
                self.show_stats();
                Ok(())
            }
            Intent::Hint => self.hint(),
            Intent::Help => {
                self.say(Category::System, HELP);
                Ok(())
            }
            Intent::Quit => {
                self.status = SessionStatus::Quit;
                self.say(Category::System, "Goodbye.");
                Ok(())
            }
            Intent::Unknown(input) => Err(FictionError::UnknownCommand(input)),
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Move the player to a scene and describe it.
    pub fn change_scene(&mut self, target: &SceneId) -> FictionResult<()> {
        if !self.world.has_scene(target) {
            return Err(FictionError::SceneNotFound(target.to_string()));
        }
        debug!(from = %self.player.scene, to = %target, "changing scene");
        self.player.scene = target.clone();

        let scene = self.world.scene(target)?;
        let cues: Vec<String> = scene
            .music
            .iter()
            .map(|m| format!("Music: {m}"))
            .chain(scene.sound_effect.iter().map(|s| format!("Sound: {s}")))
            .collect();
        for cue in cues {
            self.say(Category::Audio, cue);
        }
        let lines = self.scene_lines()?;
        self.report_all(lines);
        Ok(())
    }

    /// Leave the current scene through a named exit.
    ///
    /// A blocked exit is checked before a locked one. A cleared block or
    /// lock stays cleared.
    pub fn attempt_exit(&mut self, door: &str) -> FictionResult<()> {
        let scene_id = self.player.scene.clone();
        let doors: Vec<(usize, String)> = self
            .current_scene()?
            .exits
            .iter()
            .enumerate()
            .map(|(i, e)| (i, e.door_name.clone()))
            .collect();
        let index = match resolve_name(door, doors.iter().cloned()) {
            NameMatch::Found(i) => i,
            NameMatch::Ambiguous(candidates) => {
                return Err(FictionError::Ambiguous {
                    kind: "exit",
                    candidates,
                });
            }
            NameMatch::NotFound => {
                return Err(FictionError::NotFound {
                    kind: "exit",
                    name: door.to_string(),
                    suggestions: doors.into_iter().map(|(_, name)| name).collect(),
                });
            }
        };
        let exit = self.world.scene(&scene_id)?.exits[index].clone();

        if exit.blocked {
            if !exit.block_cleared_by(&self.player.stats, &self.player.story) {
                self.say(Category::Narration, exit.block_message());
                return Ok(());
            }
            self.world.scene_mut(&scene_id)?.exits[index].blocked = false;
            debug!(door = %exit.door_name, "exit unblocked");
            let text = exit
                .unblock_text
                .clone()
                .unwrap_or_else(|| format!("The way through the {} is clear.", exit.door_name));
            self.say(Category::Narration, text);
        }

        if exit.locked {
            let key = exit
                .required_item
                .as_ref()
                .filter(|key| self.player.has_item(key));
            let Some(key) = key else {
                self.say(Category::Narration, exit.lock_message());
                return Ok(());
            };
            if exit.consumable {
                let undo = self.player.inventory.discard(&self.world.items, key)?;
                self.player.stats.apply(&undo);
            }
            self.world.scene_mut(&scene_id)?.exits[index].locked = false;
            debug!(door = %exit.door_name, "exit unlocked");
            let text = exit
                .unlock_text
                .clone()
                .unwrap_or_else(|| format!("You unlock the {}.", exit.door_name));
            self.say(Category::Narration, text);
        }

        self.change_scene(&exit.scene_id)
    }

    // -----------------------------------------------------------------------
    // Looking around
    // -----------------------------------------------------------------------

    fn explore(&mut self) -> FictionResult<()> {
        let lines = self.scene_lines()?;
        self.report_all(lines);
        if let Some(event) = self.random_event()? {
            self.say(Category::Narration, event);
        }
        Ok(())
    }

    /// Pick a random event from the scene and the characters present.
    fn random_event(&mut self) -> FictionResult<Option<String>> {
        let scene = self.world.scene(&self.player.scene)?;
        let mut pool: Vec<String> = scene.random_events.clone();
        for character in scene
            .characters
            .iter()
            .filter_map(|id| self.world.character(id).ok())
            .filter(|c| !c.is_defeated())
        {
            pool.extend(character.random_events.iter().cloned());
        }
        if pool.is_empty() || self.rng.random_range(0..100) >= self.config.random_event_chance {
            return Ok(None);
        }
        let pick = self.rng.random_range(0..pool.len());
        Ok(Some(pool.swap_remove(pick)))
    }

    /// Describe the current scene: prose, items, characters, exits.
    fn scene_lines(&self) -> FictionResult<Vec<(Category, String)>> {
        let scene = self.current_scene()?;
        let mut lines = vec![(Category::Narration, format!("== {} ==", scene.title()))];
        if !scene.description.is_empty() {
            lines.push((Category::Narration, scene.description.clone()));
        }
        if !scene.items.is_empty() {
            lines.push((
                Category::Discovery,
                format!("You see: {}.", self.item_names(&scene.items)),
            ));
        }
        if !scene.passive_items.is_empty() {
            lines.push((
                Category::Narration,
                format!("Around you: {}.", self.item_names(&scene.passive_items)),
            ));
        }

        let people: Vec<String> = scene
            .characters
            .iter()
            .filter_map(|id| self.world.character(id).ok())
            .map(|c| {
                if c.is_defeated() {
                    format!("{} (defeated)", c.name)
                } else {
                    format!("{} ({})", c.name, c.kind)
                }
            })
            .collect();
        if !people.is_empty() {
            lines.push((Category::Narration, format!("Here: {}.", people.join(", "))));
        }

        let exits: Vec<String> = scene
            .exits
            .iter()
            .map(|e| {
                if e.blocked {
                    format!("{} (blocked)", e.door_name)
                } else if e.locked {
                    format!("{} (locked)", e.door_name)
                } else {
                    e.door_name.clone()
                }
            })
            .collect();
        if !exits.is_empty() {
            lines.push((Category::Narration, format!("Exits: {}.", exits.join(", "))));
        }
        Ok(lines)
    }

    /// Look at something in the scene, running its state machine if it has
    /// one. Falls back to carried items and characters present.
    pub fn interact_with_item(&mut self, name: &str) -> FictionResult<()> {
        let scope: Vec<ItemId> = self.current_scene()?.interactable_items().cloned().collect();
        match self.world.items.find_by_name_fragment(name, &scope) {
            Match::Found(id) => return self.examine_item(&id),
            Match::Ambiguous(ids) => return Err(self.ambiguous(&ids)),
            Match::NotFound => {}
        }

        let carried: Vec<ItemId> = self.player.inventory.all().cloned().collect();
        if let Some(id) = self.world.items.find_by_name_fragment(name, &carried).found() {
            let item = self.world.items.get(id.as_str())?;
            let mut text = if item.description.is_empty() {
                format!("It's your {}.", item.name)
            } else {
                item.description.clone()
            };
            if item.repaired {
                text.push_str(" It has been repaired.");
            }
            self.say(Category::Narration, text);
            return Ok(());
        }

        if let NameMatch::Found(id) = self.match_character(name)? {
            let character = self.world.character(&id)?;
            let mut text = if character.description.is_empty() {
                format!("{} is here.", character.name)
            } else {
                character.description.clone()
            };
            text.push_str(&if character.is_defeated() {
                format!(" {} has been defeated.", character.name)
            } else {
                format!(" {} seems {}.", character.name, character.kind)
            });
            self.say(Category::Narration, text);
            return Ok(());
        }

        let pick = self.rng.random_range(0..NOTHING_HERE.len());
        self.say(Category::Narration, NOTHING_HERE[pick]);
        let mut everything = scope;
        everything.extend(carried);
        Err(self.not_found("item", name, &everything))
    }

    fn examine_item(&mut self, id: &ItemId) -> FictionResult<()> {
        let item = self.world.items.get(id.as_str())?;
        let interactive = item.interactive && !item.states.is_empty();
        if !item.description.is_empty() {
            let text = item.description.clone();
            self.say(Category::Narration, text);
        } else if !interactive {
            let text = format!("It's an ordinary {}.", item.name.to_lowercase());
            self.say(Category::Narration, text);
        }
        if interactive {
            self.run_item_state(id)?;
        }
        Ok(())
    }

    fn hint(&mut self) -> FictionResult<()> {
        let hint = self
            .current_scene()?
            .hint
            .clone()
            .unwrap_or_else(|| "There are no hints for this place.".to_string());
        self.say(Category::System, hint);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    fn take(&mut self, name: &str) -> FictionResult<()> {
        let scene = self.current_scene()?;
        let collectibles = scene.items.clone();
        let fixtures = scene.passive_items.clone();
        let id = match self.world.items.find_by_name_fragment(name, &collectibles) {
            Match::Found(id) => id,
            Match::Ambiguous(ids) => return Err(self.ambiguous(&ids)),
            Match::NotFound => {
                let fixed = self.world.items.find_by_name_fragment(name, &fixtures).found();
                if let Some(fixed) = fixed {
                    return Err(FictionError::CannotTake(self.world.items.name_of(&fixed)));
                }
                return Err(self.not_found("item", name, &collectibles));
            }
        };
        self.pick_up(&id)
    }

    /// Move an item from the current scene into the inventory.
    pub(crate) fn pick_up(&mut self, id: &ItemId) -> FictionResult<()> {
        self.world.scene_mut(&self.player.scene)?.remove_item(id);
        self.player.inventory.add(id.clone());
        let text = format!("You take the {}.", self.world.items.name_of(id));
        self.say(Category::Discovery, text);
        self.settle_take_states(id)
    }

    fn drop_item(&mut self, name: &str) -> FictionResult<()> {
        let carried = self.player.inventory.items().to_vec();
        let id = self.resolve_held(name, &carried, InventoryError::NotInInventory)?;
        self.player.inventory.remove(&self.world.items, &id)?;
        self.world.scene_mut(&self.player.scene)?.add_item(id.clone());
        let text = format!("You drop the {}.", self.world.items.name_of(&id));
        self.say(Category::Narration, text);
        Ok(())
    }

    fn use_item(&mut self, name: &str) -> FictionResult<()> {
        let carried = self.player.inventory.items().to_vec();
        let id = self.resolve_held(name, &carried, InventoryError::NotInInventory)?;
        let item = self.world.items.get(id.as_str())?;
        if !item.usable {
            return Err(FictionError::NotUsable(item.name.clone()));
        }
        let item_name = item.name.clone();
        let effect = item.effect.clone();
        let consumable = item.consumable;

        self.player.stats.apply(&effect);
        if consumable {
            self.player.inventory.remove(&self.world.items, &id)?;
        }
        debug!(item = %id, consumable, "used item");
        self.say(Category::Narration, format!("You use the {item_name}."));
        if effect.is_empty() {
            self.say(Category::Narration, "Nothing seems to happen.");
        }
        self.report_delta(&effect);
        Ok(())
    }

    fn equip(&mut self, name: &str) -> FictionResult<()> {
        let carried = self.player.inventory.items().to_vec();
        let id = self.resolve_held(name, &carried, InventoryError::NotInInventory)?;
        let bonus = self.player.inventory.equip(&self.world.items, &id)?;
        self.player.stats.apply(&bonus);
        let text = format!("You equip the {}.", self.world.items.name_of(&id));
        self.say(Category::Narration, text);
        self.report_delta(&bonus);
        Ok(())
    }

    fn unequip(&mut self, name: &str) -> FictionResult<()> {
        let equipped = self.player.inventory.equipped().to_vec();
        let id = self.resolve_held(name, &equipped, InventoryError::NotEquipped)?;
        let undo = self.player.inventory.unequip(&self.world.items, &id)?;
        self.player.stats.apply(&undo);
        let text = format!("You take off the {}.", self.world.items.name_of(&id));
        self.say(Category::Narration, text);
        self.report_delta(&undo);
        Ok(())
    }

    fn combine(&mut self, a: &str, b: &str) -> FictionResult<()> {
        let carried = self.player.inventory.items().to_vec();
        let a = self.resolve_held(a, &carried, InventoryError::NotInInventory)?;
        let b = self.resolve_held(b, &carried, InventoryError::NotInInventory)?;
        let product = self.player.inventory.combine(&self.world.items, &a, &b)?;
        let items = &self.world.items;
        let text = format!(
            "You combine the {} and the {} into a {}.",
            items.name_of(&a),
            items.name_of(&b),
            items.name_of(&product)
        );
        self.say(Category::Discovery, text);
        Ok(())
    }

    fn craft(&mut self, name: &str) -> FictionResult<()> {
        let recipes: Vec<ItemId> = self
            .world
            .items
            .iter()
            .filter(|item| !item.components.is_empty())
            .map(|item| item.id.clone())
            .collect();
        let target = self.resolve_in(name, &recipes)?;
        self.player.inventory.craft(&self.world.items, &target)?;
        let text = format!("You craft a {}.", self.world.items.name_of(&target));
        self.say(Category::Discovery, text);
        Ok(())
    }

    fn repair(&mut self, name: &str) -> FictionResult<()> {
        let held: Vec<ItemId> = self.player.inventory.all().cloned().collect();
        let id = self.resolve_held(name, &held, InventoryError::NotInInventory)?;
        let tool = self.player.inventory.repair(&mut self.world.items, &id)?;
        let text = format!(
            "You repair the {} using the {}.",
            self.world.items.name_of(&id),
            self.world.items.name_of(&tool)
        );
        self.say(Category::Discovery, text);
        Ok(())
    }

    fn show_inventory(&mut self) {
        let inventory = &self.player.inventory;
        let mut lines = Vec::new();
        if inventory.is_empty() {
            lines.push("You are carrying nothing.".to_string());
        }
        if !inventory.items().is_empty() {
            lines.push(format!("You are carrying: {}.", self.item_names(inventory.items())));
        }
        if !inventory.equipped().is_empty() {
            lines.push(format!("Equipped: {}.", self.item_names(inventory.equipped())));
        }
        for line in lines {
            self.say(Category::System, line);
        }
    }

    fn show_stats(&mut self) {
        let s = self.player.stats;
        let text = format!(
            "Health: {}  Attack: {}  Defense: {}  Strength: {}  Critical: {}%",
            s.health, s.attack, s.defense, s.strength, s.critical_hit_chance
        );
        self.say(Category::System, text);
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    pub(crate) fn say(&mut self, category: Category, text: impl AsRef<str>) {
        self.presenter.report(text.as_ref(), category);
    }

    pub(crate) fn report_all(&mut self, lines: Vec<(Category, String)>) {
        for (category, text) in lines {
            self.presenter.report(&text, category);
        }
    }

    /// Ask the player something. A closed input aborts the current action.
    pub(crate) fn ask(&mut self, prompt: &str) -> FictionResult<String> {
        self.input
            .request_input(prompt)
            .ok_or(FictionError::InputClosed)
    }

    pub(crate) fn report_delta(&mut self, delta: &StatDelta) {
        for (stat, value) in delta {
            let verb = if *value >= 0 { "rises" } else { "drops" };
            let text = format!("Your {stat} {verb} by {}.", value.abs());
            self.say(Category::Narration, text);
        }
    }

    pub(crate) fn current_scene(&self) -> FictionResult<&Scene> {
        Ok(self.world.scene(&self.player.scene)?)
    }

    pub(crate) fn item_names(&self, ids: &[ItemId]) -> String {
        ids.iter()
            .map(|id| self.world.items.name_of(id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub(crate) fn ambiguous(&self, ids: &[ItemId]) -> FictionError {
        FictionError::Ambiguous {
            kind: "item",
            candidates: ids.iter().map(|id| self.world.items.name_of(id)).collect(),
        }
    }

    pub(crate) fn not_found(
        &self,
        kind: &'static str,
        name: &str,
        scope: &[ItemId],
    ) -> FictionError {
        FictionError::NotFound {
            kind,
            name: name.to_string(),
            suggestions: self.world.items.suggest(name, scope, 3),
        }
    }

    /// Resolve an item name among `scope`.
    pub(crate) fn resolve_in(&self, name: &str, scope: &[ItemId]) -> FictionResult<ItemId> {
        match self.world.items.find_by_name_fragment(name, scope) {
            Match::Found(id) => Ok(id),
            Match::Ambiguous(ids) => Err(self.ambiguous(&ids)),
            Match::NotFound => Err(self.not_found("item", name, scope)),
        }
    }

    /// Resolve an item name among items the player holds. A miss is an
    /// inventory error built by `missing`.
    pub(crate) fn resolve_held(
        &self,
        name: &str,
        scope: &[ItemId],
        missing: fn(String) -> InventoryError,
    ) -> FictionResult<ItemId> {
        match self.world.items.find_by_name_fragment(name, scope) {
            Match::Found(id) => Ok(id),
            Match::Ambiguous(ids) => Err(self.ambiguous(&ids)),
            Match::NotFound => Err(missing(name.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{ScriptedInput, Transcript};
    use crate::testing::{ISLAND, session, session_with};
    use cw_core::Stat;

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    #[test]
    fn start_reports_intro_and_scene() {
        let world = World::from_json(ISLAND).unwrap();
        let mut s = GameSession::new(
            world,
            EngineConfig::default(),
            Transcript::new(),
            ScriptedInput::default(),
        );
        s.start().unwrap();
        let t = s.presenter();
        assert_eq!(t.entries()[0], (Category::Narration, "You wake on a beach.".to_string()));
        assert_eq!(t.in_category(Category::Audio), vec!["Music: waves.ogg"]);
        assert!(t.contains("== Sandy Beach =="));
        assert!(t.contains("Old Hermit (neutral)"));
        assert!(t.contains("Exits: jungle path, rockfall (blocked), hatch (locked)."));
    }

    #[test]
    fn change_scene_to_unknown_scene() {
        let mut s = session(&[]);
        let err = s.change_scene(&SceneId::from("moon")).unwrap_err();
        assert!(matches!(err, FictionError::SceneNotFound(_)));
        assert_eq!(s.player().scene, SceneId::from("beach"));
    }

    #[test]
    fn take_and_drop_keep_items_in_one_place() {
        let mut s = session(&[]);
        s.execute(Intent::Take("stick".into())).unwrap();
        assert!(s.player().inventory.carries(&id("stick")));
        assert!(s.world().scene_holding(&id("stick")).is_none());

        s.execute(Intent::Drop("stick".into())).unwrap();
        assert!(!s.player().has_item(&id("stick")));
        assert_eq!(s.world().scene_holding(&id("stick")), Some(&SceneId::from("beach")));
    }

    #[test]
    fn fixtures_cannot_be_taken() {
        let mut s = session(&[]);
        let err = s.execute(Intent::Take("locker".into())).unwrap_err();
        assert!(matches!(err, FictionError::CannotTake(name) if name == "Metal Locker"));
    }

    #[test]
    fn unknown_item_suggests_names() {
        let mut s = session(&[]);
        match s.execute(Intent::Take("stik".into())).unwrap_err() {
            FictionError::NotFound { suggestions, .. } => {
                assert!(suggestions.contains(&"Sturdy Stick".to_string()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn combine_stick_and_stone_then_repeat() {
        let mut s = session(&[]);
        s.process("take stick");
        s.process("take stone");
        s.execute(Intent::Combine("stick".into(), "stone".into())).unwrap();
        assert!(s.player().inventory.carries(&id("axe")));
        assert!(!s.player().has_item(&id("stick")));
        assert!(s.presenter().contains("into a Stone Axe"));

        let err = s
            .execute(Intent::Combine("stick".into(), "stone".into()))
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::InvalidPrecondition);
        assert!(s.player().inventory.carries(&id("axe")));
    }

    #[test]
    fn repair_communicator_with_energy_cells() {
        let mut s = session(&[]);
        s.process("take communicator");
        s.process("take energy cells");
        s.execute(Intent::Repair("communicator".into())).unwrap();
        assert!(s.world().items.get("communicator").unwrap().repaired);
        assert!(!s.player().has_item(&id("energy_cells")));
        assert!(s.presenter().contains("You repair the Communicator using the Energy Cells."));

        let err = s.execute(Intent::Repair("communicator".into())).unwrap_err();
        assert!(matches!(
            err,
            FictionError::Inventory(InventoryError::MissingRepairTool { .. })
        ));
    }

    #[test]
    fn use_applies_effect_and_consumes() {
        let mut s = session(&[]);
        s.player_mut().stats.health = 50;
        s.process("go jungle path");
        s.process("take berries");
        s.execute(Intent::Use("berries".into())).unwrap();
        assert_eq!(s.player().stats.health, 70);
        assert!(!s.player().has_item(&id("berries")));
        assert!(s.presenter().contains("Your health rises by 20."));
    }

    #[test]
    fn use_requires_usable_item() {
        let mut s = session(&[]);
        s.process("take stick");
        let err = s.execute(Intent::Use("stick".into())).unwrap_err();
        assert!(matches!(err, FictionError::NotUsable(_)));
    }

    #[test]
    fn equip_and_unequip_adjust_stats() {
        let mut s = session(&[]);
        s.process("go jungle path");
        s.process("take jacket");
        s.execute(Intent::Equip("jacket".into())).unwrap();
        assert_eq!(s.player().stats.get(Stat::Defense), 3);
        assert!(s.player().inventory.is_equipped(&id("jacket")));

        s.execute(Intent::Unequip("jacket".into())).unwrap();
        assert_eq!(s.player().stats.get(Stat::Defense), 0);
        let err = s.execute(Intent::Unequip("jacket".into())).unwrap_err();
        assert!(matches!(err, FictionError::Inventory(InventoryError::NotEquipped(_))));
    }

    #[test]
    fn craft_from_components() {
        let mut s = session(&[]);
        s.process("take stick");
        let err = s.execute(Intent::Craft("axe".into())).unwrap_err();
        assert!(err.to_string().contains("Flat Stone"));
        s.process("take stone");
        s.execute(Intent::Craft("axe".into())).unwrap();
        assert!(s.player().inventory.carries(&id("axe")));
    }

    #[test]
    fn stat_blocked_exit() {
        let mut s = session(&[]);
        s.player_mut().stats.strength = 8;
        s.execute(Intent::Exit("rockfall".into())).unwrap();
        assert_eq!(s.player().scene, SceneId::from("beach"));
        assert!(s.presenter().contains("Boulders block the way."));

        s.player_mut().stats.strength = 10;
        s.execute(Intent::Exit("rockfall".into())).unwrap();
        assert_eq!(s.player().scene, SceneId::from("cave"));
        assert!(s.presenter().contains("You heave the boulders aside."));
    }

    #[test]
    fn cleared_exits_stay_cleared() {
        let mut s = session(&[]);
        s.player_mut().stats.strength = 10;
        s.process("go rockfall");
        s.process("go out");
        s.player_mut().stats.strength = 1;
        s.presenter_mut().clear();
        s.execute(Intent::Exit("rockfall".into())).unwrap();
        assert_eq!(s.player().scene, SceneId::from("cave"));
        assert!(!s.presenter().contains("Boulders"));
    }

    #[test]
    fn locked_exit_consumes_key_once() {
        let mut s = session(&[]);
        s.execute(Intent::Exit("hatch".into())).unwrap();
        assert_eq!(s.player().scene, SceneId::from("beach"));
        assert!(s.presenter().contains("The hatch is locked."));

        s.player_mut().inventory.add(id("rusty_key"));
        s.execute(Intent::Exit("hatch".into())).unwrap();
        assert_eq!(s.player().scene, SceneId::from("bunker"));
        assert!(!s.player().has_item(&id("rusty_key")));

        s.process("go ladder");
        s.execute(Intent::Exit("hatch".into())).unwrap();
        assert_eq!(s.player().scene, SceneId::from("bunker"));
    }

    #[test]
    fn flag_blocked_exit() {
        let mut s = session(&[]);
        s.process("go jungle");
        s.process("go gate");
        assert_eq!(s.player().scene, SceneId::from("jungle"));
        s.player_mut().story.set("gate_open", true);
        s.execute(Intent::Exit("gate".into())).unwrap();
        assert_eq!(s.player().scene, SceneId::from("village"));
    }

    #[test]
    fn unknown_exit_lists_doors() {
        let mut s = session(&[]);
        match s.execute(Intent::Exit("chimney".into())).unwrap_err() {
            FictionError::NotFound { kind, suggestions, .. } => {
                assert_eq!(kind, "exit");
                assert_eq!(suggestions.len(), 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn examine_nothing_reports_and_fails() {
        let mut s = session(&[]);
        let err = s.execute(Intent::Examine("unicorn".into())).unwrap_err();
        assert_eq!(err.class(), ErrorClass::NotFound);
        let said = s.presenter().in_category(Category::Narration);
        assert!(said.iter().any(|line| NOTHING_HERE.contains(line)));
    }

    #[test]
    fn examine_character() {
        let mut s = session(&[]);
        s.execute(Intent::Examine("hermit".into())).unwrap();
        assert!(s.presenter().contains("A wiry man in rags. Old Hermit seems neutral."));
    }

    #[test]
    fn explore_with_certain_event() {
        let mut s = session_with(EngineConfig::default().with_random_event_chance(100), &[]);
        s.execute(Intent::Explore).unwrap();
        assert!(s.presenter().contains("A gull cries overhead."));

        let mut s = session_with(EngineConfig::default().with_random_event_chance(0), &[]);
        s.execute(Intent::Explore).unwrap();
        assert!(!s.presenter().contains("A gull cries overhead."));
    }

    #[test]
    fn handle_reports_errors_as_system() {
        let mut s = session(&[]);
        assert_eq!(s.process("dance wildly"), Some(ErrorClass::InvalidInput));
        assert!(s.presenter().in_category(Category::System)[0].contains("dance wildly"));
        assert_eq!(s.process("inventory"), None);
        assert!(s.presenter().contains("You are carrying nothing."));
    }

    #[test]
    fn quit_ends_the_game() {
        let mut s = session(&[]);
        s.process("quit");
        assert!(s.is_over());
        s.process("take stick");
        assert!(!s.player().has_item(&id("stick")));
        assert!(s.presenter().contains("The game is over."));
    }

    #[test]
    fn hint_and_stats() {
        let mut s = session(&[]);
        s.process("hint");
        s.process("stats");
        assert!(s.presenter().contains("Try the locker."));
        assert!(s.presenter().contains("Health: 100"));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        const COMMANDS: &[&str] = &[
            "take stick",
            "take stone",
            "take jacket",
            "take berries",
            "drop stick",
            "drop jacket",
            "wear jacket",
            "remove jacket",
            "eat berries",
            "combine stick with stone",
            "craft axe",
            "examine locker",
            "take rusty key",
            "go jungle path",
            "go beach",
            "go hatch",
        ];

        proptest! {
            #[test]
            fn items_never_in_two_places(
                picks in prop::collection::vec(0..COMMANDS.len(), 0..40)
            ) {
                let mut s = session(&[]);
                for pick in picks {
                    s.process(COMMANDS[pick]);
                }
                let inv = &s.player().inventory;
                for item in inv.items() {
                    prop_assert!(!inv.is_equipped(item));
                    prop_assert!(s.world().scene_holding(item).is_none());
                }
                for item in inv.equipped() {
                    prop_assert!(s.world().scene_holding(item).is_none());
                }
                let mut seen = std::collections::BTreeSet::new();
                for scene in s.world().scenes() {
                    for item in &scene.items {
                        prop_assert!(seen.insert(item.clone()), "{item} in two scenes");
                    }
                }
            }
        }
    }
}
