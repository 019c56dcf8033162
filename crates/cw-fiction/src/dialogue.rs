//! Conversations, gifts, and fights with characters.

use cw_core::{CharacterId, StatDelta};
use cw_mechanics::{Battle, Combatant, Outcome, PlayerAction};
use tracing::{debug, info};

use crate::choice::{apply_effects, check_effects, evaluate};
use crate::error::{FictionError, FictionResult};
use crate::inventory::InventoryError;
use crate::io::{Category, InputSource, Presenter};
use crate::parser::{NameMatch, resolve_name};
use crate::session::{GameSession, SessionStatus};

const COMBAT_MENU: &str = "1. Attack  2. Defend";

impl<P: Presenter, I: InputSource> GameSession<P, I> {
    /// Match a name against the characters in the current scene.
    pub(crate) fn match_character(&self, name: &str) -> FictionResult<NameMatch<CharacterId>> {
        let present: Vec<(CharacterId, String)> = self
            .current_scene()?
            .characters
            .iter()
            .filter_map(|id| self.world.character(id).ok())
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();
        Ok(resolve_name(name, present))
    }

    fn resolve_character(&self, name: &str) -> FictionResult<CharacterId> {
        match self.match_character(name)? {
            NameMatch::Found(id) => Ok(id),
            NameMatch::Ambiguous(candidates) => Err(FictionError::Ambiguous {
                kind: "character",
                candidates,
            }),
            NameMatch::NotFound => Err(FictionError::NotFound {
                kind: "character",
                name: name.to_string(),
                suggestions: self
                    .current_scene()?
                    .characters
                    .iter()
                    .filter_map(|id| self.world.character(id).ok())
                    .map(|c| c.name.clone())
                    .collect(),
            }),
        }
    }

    /// Hold a conversation with a character in the scene.
    ///
    /// Shows the greeting and the options whose conditions hold, then
    /// reads one choice by number or label. An empty answer or `bye`
    /// leaves; anything else unrecognised asks again.
    pub fn talk_to(&mut self, name: &str) -> FictionResult<()> {
        let id = self.resolve_character(name)?;
        let character = self.world.character(&id)?.clone();
        let who = character.name.as_str();

        if !character.kind.will_talk() {
            self.say(Category::Dialogue, format!("The {who} snarls and refuses to talk."));
            return Ok(());
        }
        if character.is_defeated() {
            self.say(Category::Dialogue, format!("The {who} is in no state to talk."));
            return Ok(());
        }

        if character.greeting.is_empty() {
            self.say(Category::Dialogue, format!("The {who} looks at you."));
        } else {
            self.say(Category::Dialogue, format!("{who}: \"{}\"", character.greeting));
        }

        let options: Vec<_> = character
            .dialogue
            .iter()
            .filter(|option| evaluate(&option.requires, &self.player))
            .collect();
        if options.is_empty() {
            self.say(Category::Dialogue, format!("The {who} has nothing more to say."));
            return Ok(());
        }
        for (i, option) in options.iter().enumerate() {
            self.say(Category::Dialogue, format!("{}. {}", i + 1, option.menu_text()));
        }

        let chosen = loop {
            let answer = self.ask("What do you say? (or 'bye')")?;
            let answer = answer.trim();
            if answer.is_empty() || answer.eq_ignore_ascii_case("bye") {
                self.say(Category::Dialogue, "You end the conversation.");
                return Ok(());
            }
            let by_number = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i));
            let by_label = || options.iter().find(|o| o.label.eq_ignore_ascii_case(answer));
            match by_number.or_else(by_label) {
                Some(option) => break *option,
                None => {
                    let err = FictionError::InvalidChoice(answer.to_string());
                    self.say(Category::System, err.to_string());
                }
            }
        };

        debug!(character = %id, option = %chosen.label, "dialogue choice");
        let reports = apply_effects(&chosen.effects, &mut self.world, &mut self.player)?;
        self.say(Category::Dialogue, format!("{who}: \"{}\"", chosen.response));
        self.report_all(reports);
        Ok(())
    }

    /// Hand a carried or equipped item to a character in the scene.
    ///
    /// An equipped item is taken off first, so its bonus goes with it.
    pub fn give_item_to(&mut self, item: &str, character: &str) -> FictionResult<()> {
        let held: Vec<_> = self.player.inventory.all().cloned().collect();
        let item_id = self.resolve_held(item, &held, InventoryError::NotInInventory)?;
        let char_id = self.resolve_character(character)?;

        let target = self.world.character(&char_id)?;
        let who = target.name.clone();
        let Some(interaction) = target.interaction_for(&item_id).cloned() else {
            let text = format!(
                "The {who} shows no interest in the {}.",
                self.world.items.name_of(&item_id)
            );
            self.say(Category::Dialogue, text);
            return Ok(());
        };

        let mut after = self.player.clone();
        let undo = if interaction.keep_item {
            StatDelta::new()
        } else {
            after.inventory.discard(&self.world.items, &item_id)?
        };
        after.stats.apply(&undo);
        check_effects(&interaction.effects, &self.world, &after)?;
        self.player = after;

        let reports = apply_effects(&interaction.effects, &mut self.world, &mut self.player)?;
        debug!(character = %char_id, item = %item_id, "gave item");
        self.say(Category::Dialogue, interaction.text);
        self.report_delta(&undo);
        self.report_all(reports);
        Ok(())
    }

    /// Fight a character in the scene until one side falls.
    ///
    /// Each round reads an action from the input. Unrecognised answers ask
    /// again without using up the round.
    pub fn fight(&mut self, name: &str) -> FictionResult<()> {
        let id = self.resolve_character(name)?;
        let enemy = self.world.character(&id)?;
        let enemy_name = enemy.name.clone();
        if enemy.is_defeated() {
            return Err(FictionError::CannotFight(format!(
                "The {enemy_name} is already defeated."
            )));
        }
        if !enemy.kind.can_fight() {
            return Err(FictionError::CannotFight(format!(
                "The {enemy_name} is friendly. You won't fight them."
            )));
        }

        let mut battle = Battle::new(
            Combatant::new("you", self.player.stats),
            Combatant::new(enemy_name.clone(), enemy.stats),
            self.config.combat.clone(),
        )?;
        info!(enemy = %id, "battle started");
        self.say(Category::Combat, format!("You face the {enemy_name}!"));

        while !battle.outcome().is_over() {
            let Some(answer) = self.input.request_input(COMBAT_MENU) else {
                self.settle_battle(&id, battle)?;
                return Err(FictionError::InputClosed);
            };
            let Some(action) = PlayerAction::parse(&answer) else {
                self.say(Category::System, "Choose 1 to attack or 2 to defend.");
                continue;
            };
            for event in battle.round(action, &mut self.rng) {
                self.say(Category::Combat, event.narrate(&enemy_name));
            }
        }
        self.settle_battle(&id, battle)
    }

    /// Write a battle's results back into the world.
    fn settle_battle(&mut self, id: &CharacterId, battle: Battle) -> FictionResult<()> {
        let result = battle.finish();
        info!(enemy = %id, outcome = ?result.outcome, rounds = result.rounds, "battle ended");
        self.player.stats = result.player;
        let enemy = self.world.character_mut(id)?;
        enemy.stats = result.enemy;

        match result.outcome {
            Outcome::PlayerWon => {
                let enemy_name = enemy.name.clone();
                let loot = std::mem::take(&mut enemy.inventory);
                self.player.story.set(format!("defeated_{id}"), true);
                for item in loot {
                    self.world.scene_mut(&self.player.scene)?.add_item(item.clone());
                    let text = format!(
                        "The {enemy_name} drops a {}.",
                        self.world.items.name_of(&item)
                    );
                    self.say(Category::Discovery, text);
                }
                let victory = self.world.story_text(&format!("victory_{id}")).map(str::to_string);
                if let Some(text) = victory {
                    self.say(Category::Narration, text);
                }
            }
            Outcome::PlayerLost => {
                self.status = SessionStatus::Lost;
                self.say(Category::System, "You have been defeated. Game over.");
            }
            Outcome::Ongoing => {}
        }
        Ok(())
    }
}
