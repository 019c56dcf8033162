//! Item state-machine interaction.
//!
//! An interactive item sits in one named state at a time. Examining it
//! shows the state's description and then tries the state's action.

use cw_core::{ItemId, ItemState, StateAction, UnlockRequirement};
use tracing::debug;

use crate::error::FictionResult;
use crate::io::{Category, InputSource, Presenter};
use crate::session::GameSession;

impl<P: Presenter, I: InputSource> GameSession<P, I> {
    /// Show an item's current state and run its action.
    pub fn run_item_state(&mut self, id: &ItemId) -> FictionResult<()> {
        let Some(state) = self.world.items.get(id.as_str())?.state().cloned() else {
            return Ok(());
        };
        self.say(Category::Narration, &state.description);
        match state.action {
            Some(StateAction::Open) => self.open_item(id, &state),
            Some(StateAction::Unlock) => self.unlock_item(id, &state),
            Some(StateAction::Take) => self.take_reward(&state),
            Some(StateAction::None) | None => Ok(()),
        }
    }

    fn open_item(&mut self, id: &ItemId, state: &ItemState) -> FictionResult<()> {
        let item = self.world.items.get(id.as_str())?;
        if item.locked {
            let text = format!("The {} is locked.", item.name);
            self.say(Category::Narration, text);
            return Ok(());
        }
        self.transition(id, state)?;

        let item = self.world.items.get(id.as_str())?;
        if item.current_state != "open" && item.contents.is_empty() {
            return Ok(());
        }
        let name = item.name.clone();
        for content in item.contents.clone() {
            let placed =
                self.player.has_item(&content) || self.world.scene_holding(&content).is_some();
            if placed {
                continue;
            }
            self.world.scene_mut(&self.player.scene)?.add_item(content.clone());
            let found = self.world.items.name_of(&content);
            let text = format!("Inside the {name} you find the {found}.");
            self.say(Category::Discovery, text);
        }
        Ok(())
    }

    fn unlock_item(&mut self, id: &ItemId, state: &ItemState) -> FictionResult<()> {
        let item = self.world.items.get(id.as_str())?;
        let name = item.name.clone();
        let refusal = match item.unlock_required_item.clone() {
            Some(UnlockRequirement::Passcode) => {
                let code = self.ask(&format!("Enter the code for the {name}:"))?;
                (code.trim() != self.config.passcode)
                    .then(|| format!("The {name} beeps. Wrong code."))
            }
            Some(UnlockRequirement::Item(key)) => {
                let opens = self.player.has_item(&key) || self.has_bypass_tool();
                (!opens).then(|| {
                    let key = self.world.items.name_of(&key);
                    format!("You need the {key} to unlock the {name}.")
                })
            }
            None => (!self.has_bypass_tool())
                .then(|| format!("You need a tool to unlock the {name}.")),
        };
        if let Some(text) = refusal {
            debug!(item = %id, "unlock refused");
            self.say(Category::Narration, text);
            return Ok(());
        }

        self.world.items.get_mut(id.as_str())?.locked = false;
        self.transition(id, state)?;
        self.say(Category::Discovery, format!("The {name} unlocks."));
        Ok(())
    }

    fn has_bypass_tool(&self) -> bool {
        self.player.has_item(&self.config.bypass_tool)
    }

    fn take_reward(&mut self, state: &ItemState) -> FictionResult<()> {
        let here = self.current_scene()?;
        let reward = state.reward.as_ref().filter(|reward| here.has_item(reward));
        match reward {
            Some(reward) => self.pick_up(&reward.clone()),
            None => {
                self.say(Category::Narration, "There is nothing to take.");
                Ok(())
            }
        }
    }

    fn transition(&mut self, id: &ItemId, state: &ItemState) -> FictionResult<()> {
        if let Some(next) = &state.next_state {
            let item = self.world.items.get_mut(id.as_str())?;
            debug!(item = %id, from = %item.current_state, to = %next, "state change");
            item.current_state = next.clone();
        }
        Ok(())
    }

    /// Move every item here that is waiting to hand over `reward` past its
    /// take state, so the reward is never offered twice.
    pub(crate) fn settle_take_states(&mut self, reward: &ItemId) -> FictionResult<()> {
        let offers_reward = |state: &ItemState| {
            state.action == Some(StateAction::Take) && state.reward.as_ref() == Some(reward)
        };
        let holders: Vec<(ItemId, ItemState)> = self
            .current_scene()?
            .interactable_items()
            .filter_map(|id| self.world.items.get(id.as_str()).ok())
            .filter_map(|item| item.state().map(|state| (item.id.clone(), state.clone())))
            .filter(|(_, state)| offers_reward(state))
            .collect();
        for (holder, state) in holders {
            self.transition(&holder, &state)?;
        }
        Ok(())
    }
}
