//! Configuration for a game session.

use cw_core::ItemId;
use cw_mechanics::CombatRules;

/// Configuration for a game session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed for reproducible combat and random events.
    pub seed: u64,
    /// Code accepted by passcode-locked items.
    pub passcode: String,
    /// Item that forces locks with no listed requirement.
    pub bypass_tool: ItemId,
    /// Percent chance (0-100) that exploring shows a random event.
    pub random_event_chance: u32,
    /// Combat constants.
    pub combat: CombatRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            passcode: "321".to_string(),
            bypass_tool: ItemId::from("bent_wire"),
            random_event_chance: 25,
            combat: CombatRules::default(),
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the passcode.
    pub fn with_passcode(mut self, passcode: impl Into<String>) -> Self {
        self.passcode = passcode.into();
        self
    }

    /// Set the lock bypass tool.
    pub fn with_bypass_tool(mut self, tool: impl Into<ItemId>) -> Self {
        self.bypass_tool = tool.into();
        self
    }

    /// Set the random event chance (clamped to 0-100).
    pub fn with_random_event_chance(mut self, percent: u32) -> Self {
        self.random_event_chance = percent.min(100);
        self
    }

    /// Replace the combat rules.
    pub fn with_combat(mut self, rules: CombatRules) -> Self {
        self.combat = rules;
        self
    }
}
