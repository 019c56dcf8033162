//! Player actions and combat events.

use serde::{Deserialize, Serialize};

/// What the player does on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Strike the enemy.
    Attack,
    /// Raise defense for the rest of the battle.
    Defend,
}

impl PlayerAction {
    /// Parse a menu answer: a number, the action name, or its first letter.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" | "a" | "attack" => Some(Self::Attack),
            "2" | "d" | "defend" => Some(Self::Defend),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attack => write!(f, "Attack"),
            Self::Defend => write!(f, "Defend"),
        }
    }
}

/// How a battle ended, or that it has not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Both sides are still standing.
    Ongoing,
    /// The enemy fell while the player still stands.
    PlayerWon,
    /// The player fell.
    PlayerLost,
}

impl Outcome {
    /// True once the battle is over.
    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }
}

/// Something that happened during a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatEvent {
    /// The player hit the enemy.
    PlayerHit {
        /// Damage dealt.
        damage: i32,
        /// Whether the hit was critical.
        critical: bool,
        /// Enemy health afterwards.
        enemy_health: i32,
    },
    /// The player braced.
    PlayerDefended {
        /// Player defense afterwards.
        defense: i32,
    },
    /// The enemy hit the player.
    EnemyHit {
        /// Damage taken.
        damage: i32,
        /// Whether the hit was critical.
        critical: bool,
        /// Player health afterwards.
        player_health: i32,
    },
    /// The player's defense absorbed the whole enemy attack.
    EnemyBlocked,
    /// The battle ended.
    Ended(Outcome),
}

impl CombatEvent {
    /// Narrate the event against a named enemy.
    pub fn narrate(&self, enemy: &str) -> String {
        match self {
            Self::PlayerHit {
                damage,
                critical,
                enemy_health,
            } => {
                let crit = if *critical { "Critical hit! " } else { "" };
                format!("{crit}You hit the {enemy} for {damage} damage. ({enemy}: {enemy_health} HP)")
            }
            Self::PlayerDefended { defense } => {
                format!("You brace yourself. (defense {defense})")
            }
            Self::EnemyHit {
                damage,
                critical,
                player_health,
            } => {
                let crit = if *critical { "A vicious blow! " } else { "" };
                format!("{crit}The {enemy} hits you for {damage} damage. (you: {player_health} HP)")
            }
            Self::EnemyBlocked => format!("You block the {enemy}'s attack completely."),
            Self::Ended(Outcome::PlayerWon) => format!("You have defeated the {enemy}!"),
            Self::Ended(Outcome::PlayerLost) => format!("The {enemy} has defeated you."),
            Self::Ended(Outcome::Ongoing) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_menu_answers() {
        assert_eq!(PlayerAction::parse("1"), Some(PlayerAction::Attack));
        assert_eq!(PlayerAction::parse(" Defend "), Some(PlayerAction::Defend));
        assert_eq!(PlayerAction::parse("d"), Some(PlayerAction::Defend));
        assert_eq!(PlayerAction::parse("flee"), None);
        assert_eq!(PlayerAction::parse(""), None);
    }

    #[test]
    fn narration() {
        let hit = CombatEvent::PlayerHit {
            damage: 30,
            critical: true,
            enemy_health: 10,
        };
        assert_eq!(
            hit.narrate("wolf"),
            "Critical hit! You hit the wolf for 30 damage. (wolf: 10 HP)"
        );
        assert!(CombatEvent::Ended(Outcome::PlayerWon).narrate("wolf").contains("defeated"));
    }
}
