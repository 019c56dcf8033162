//! Error types for combat resolution.

/// Errors that can occur when setting up a battle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MechError {
    /// A combatant entered the battle with no health left.
    #[error("{0} cannot fight with no health left")]
    CombatantDown(String),

    /// The combat rules are inconsistent.
    #[error("invalid combat rules: {0}")]
    InvalidRules(String),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
