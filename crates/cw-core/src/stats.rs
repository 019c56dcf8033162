use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named statistic on a player or character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    /// Hit points. Zero means defeated.
    Health,
    /// Flat bonus added to attack damage.
    Attack,
    /// Flat reduction applied to incoming damage.
    Defense,
    /// Raw strength, used by stat-gated exits.
    Strength,
    /// Percentage chance (0-100) of doubling damage.
    CriticalHitChance,
}

impl Stat {
    /// Every stat, in display order.
    pub const ALL: [Stat; 5] = [
        Stat::Health,
        Stat::Attack,
        Stat::Defense,
        Stat::Strength,
        Stat::CriticalHitChance,
    ];

    /// The snake_case key used in content files.
    pub fn key(self) -> &'static str {
        match self {
            Stat::Health => "health",
            Stat::Attack => "attack",
            Stat::Defense => "defense",
            Stat::Strength => "strength",
            Stat::CriticalHitChance => "critical_hit_chance",
        }
    }

    /// Parse a stat from its key (case-insensitive, spaces allowed).
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase().replace(' ', "_");
        Self::ALL.into_iter().find(|stat| stat.key() == key)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key().replace('_', " "))
    }
}

/// Per-stat changes, e.g. an item effect or an equip bonus.
pub type StatDelta = BTreeMap<Stat, i32>;

/// Negate every entry of a delta (used when unequipping).
pub fn negate(delta: &StatDelta) -> StatDelta {
    delta.iter().map(|(stat, v)| (*stat, -v)).collect()
}

/// A block of statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    /// Hit points.
    pub health: i32,
    /// Attack bonus.
    pub attack: i32,
    /// Defense.
    pub defense: i32,
    /// Strength.
    pub strength: i32,
    /// Critical hit chance in percent.
    pub critical_hit_chance: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            health: 100,
            attack: 5,
            defense: 0,
            strength: 5,
            critical_hit_chance: 10,
        }
    }
}

impl Stats {
    /// Read a single stat.
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Health => self.health,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::Strength => self.strength,
            Stat::CriticalHitChance => self.critical_hit_chance,
        }
    }

    /// Overwrite a single stat. Health never drops below zero and the
    /// critical hit chance stays within 0-100.
    pub fn set(&mut self, stat: Stat, value: i32) {
        match stat {
            Stat::Health => self.health = value.max(0),
            Stat::Attack => self.attack = value,
            Stat::Defense => self.defense = value,
            Stat::Strength => self.strength = value,
            Stat::CriticalHitChance => self.critical_hit_chance = value.clamp(0, 100),
        }
    }

    /// Add `delta` to a single stat.
    pub fn adjust(&mut self, stat: Stat, delta: i32) {
        self.set(stat, self.get(stat).saturating_add(delta));
    }

    /// Apply every entry of a delta.
    pub fn apply(&mut self, delta: &StatDelta) {
        for (stat, value) in delta {
            self.adjust(*stat, *value);
        }
    }

    /// True once health has reached zero.
    pub fn is_down(&self) -> bool {
        self.health <= 0
    }
}
