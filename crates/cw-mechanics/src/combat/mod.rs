//! The battle state machine.
//!
//! A [`Battle`] pits the player against one enemy. Each call to
//! [`Battle::round`] resolves one player action and, if the enemy survived,
//! one enemy attack. The battle works on copies of both stat blocks; the
//! caller writes the results back through [`Battle::finish`].

pub mod action;

pub use action::{CombatEvent, Outcome, PlayerAction};

use std::ops::RangeInclusive;

use cw_core::{Stat, Stats};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MechError, MechResult};

/// Tunable combat constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// Lowest base roll of a player attack.
    pub player_min_damage: i32,
    /// Highest base roll of a player attack.
    pub player_max_damage: i32,
    /// Lowest base roll of an enemy attack.
    pub enemy_min_damage: i32,
    /// Highest base roll of an enemy attack.
    pub enemy_max_damage: i32,
    /// Defense gained by defending.
    pub defend_bonus: i32,
    /// Damage multiplier on a critical hit.
    pub critical_multiplier: i32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            player_min_damage: 10,
            player_max_damage: 20,
            enemy_min_damage: 5,
            enemy_max_damage: 15,
            defend_bonus: 5,
            critical_multiplier: 2,
        }
    }
}

impl CombatRules {
    /// Check that the ranges are non-empty and player attacks always hurt.
    pub fn validate(&self) -> MechResult<()> {
        if self.player_min_damage < 1 {
            return Err(MechError::InvalidRules(
                "player attacks must deal at least 1 damage".into(),
            ));
        }
        if self.player_min_damage > self.player_max_damage
            || self.enemy_min_damage > self.enemy_max_damage
        {
            return Err(MechError::InvalidRules("empty damage range".into()));
        }
        if self.critical_multiplier < 1 {
            return Err(MechError::InvalidRules(
                "critical multiplier must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn player_range(&self) -> RangeInclusive<i32> {
        self.player_min_damage..=self.player_max_damage
    }

    fn enemy_range(&self) -> RangeInclusive<i32> {
        self.enemy_min_damage..=self.enemy_max_damage
    }
}

/// One side of a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combatant {
    /// Display name.
    pub name: String,
    /// Working copy of the stats.
    pub stats: Stats,
}

impl Combatant {
    /// Create a combatant.
    pub fn new(name: impl Into<String>, stats: Stats) -> Self {
        Self {
            name: name.into(),
            stats,
        }
    }
}

/// Final numbers of a finished (or abandoned) battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleResult {
    /// How it ended.
    pub outcome: Outcome,
    /// Player stats with pre-battle defense restored.
    pub player: Stats,
    /// Enemy stats after the battle.
    pub enemy: Stats,
    /// Rounds fought.
    pub rounds: u32,
}

/// An ongoing battle between the player and one enemy.
#[derive(Debug, Clone)]
pub struct Battle {
    /// The player's working copy.
    pub player: Combatant,
    /// The enemy's working copy.
    pub enemy: Combatant,
    rules: CombatRules,
    base_defense: i32,
    round: u32,
    outcome: Outcome,
}

impl Battle {
    /// Start a battle. Both sides must have health left.
    pub fn new(player: Combatant, enemy: Combatant, rules: CombatRules) -> MechResult<Self> {
        rules.validate()?;
        for side in [&player, &enemy] {
            if side.stats.is_down() {
                return Err(MechError::CombatantDown(side.name.clone()));
            }
        }
        Ok(Self {
            base_defense: player.stats.defense,
            player,
            enemy,
            rules,
            round: 0,
            outcome: Outcome::Ongoing,
        })
    }

    /// Current outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Rounds fought so far.
    pub fn rounds(&self) -> u32 {
        self.round
    }

    /// Resolve one round. Returns no events once the battle is over.
    pub fn round(&mut self, action: PlayerAction, rng: &mut impl Rng) -> Vec<CombatEvent> {
        if self.outcome.is_over() {
            return Vec::new();
        }
        self.round += 1;
        let mut events = Vec::new();

        match action {
            PlayerAction::Attack => {
                let (damage, critical) = roll(
                    self.rules.player_range(),
                    self.player.stats.critical_hit_chance,
                    rng,
                );
                let damage = (damage + self.player.stats.attack).max(1);
                let damage = if critical {
                    damage * self.rules.critical_multiplier
                } else {
                    damage
                };
                self.enemy.stats.adjust(Stat::Health, -damage);
                events.push(CombatEvent::PlayerHit {
                    damage,
                    critical,
                    enemy_health: self.enemy.stats.health,
                });
            }
            PlayerAction::Defend => {
                self.player.stats.defense += self.rules.defend_bonus;
                events.push(CombatEvent::PlayerDefended {
                    defense: self.player.stats.defense,
                });
            }
        }

        if !self.enemy.stats.is_down() {
            let (base, critical) = roll(
                self.rules.enemy_range(),
                self.enemy.stats.critical_hit_chance,
                rng,
            );
            let damage = base - self.player.stats.defense;
            if damage <= 0 {
                events.push(CombatEvent::EnemyBlocked);
            } else {
                let damage = if critical {
                    damage * self.rules.critical_multiplier
                } else {
                    damage
                };
                self.player.stats.adjust(Stat::Health, -damage);
                events.push(CombatEvent::EnemyHit {
                    damage,
                    critical,
                    player_health: self.player.stats.health,
                });
            }
        }

        self.outcome = if self.player.stats.is_down() {
            Outcome::PlayerLost
        } else if self.enemy.stats.is_down() {
            Outcome::PlayerWon
        } else {
            Outcome::Ongoing
        };
        debug!(
            round = self.round,
            ?action,
            player_health = self.player.stats.health,
            enemy_health = self.enemy.stats.health,
            "combat round"
        );
        if self.outcome.is_over() {
            events.push(CombatEvent::Ended(self.outcome));
        }
        events
    }

    /// End the battle, restoring the player's pre-battle defense.
    pub fn finish(self) -> BattleResult {
        let mut player = self.player.stats;
        player.defense = self.base_defense;
        BattleResult {
            outcome: self.outcome,
            player,
            enemy: self.enemy.stats,
            rounds: self.round,
        }
    }
}

/// Roll base damage and a critical check.
fn roll(range: RangeInclusive<i32>, crit_chance: i32, rng: &mut impl Rng) -> (i32, bool) {
    let damage = rng.random_range(range);
    let critical = rng.random_range(0..100) < crit_chance;
    (damage, critical)
}
