use thiserror::Error;

/// Failures surfaced by the battle core and the roster boundary.
///
/// None of these are retried. A failure mid-turn abandons the battle in
/// whatever state it reached; the log is not rolled back.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BattleError {
    #[error("invalid move index {index} for {combatant} (knows {len} moves)")]
    InvalidMoveIndex {
        combatant: String,
        index: usize,
        len: usize,
    },
    #[error("no combatant named '{name}' in the roster")]
    MissingCombatant { name: String },
    #[error("combatant name '{name}' appears more than once in the roster")]
    DuplicateCombatant { name: String },
    #[error("unknown elemental type '{name}'")]
    InvalidType { name: String },
    #[error("the roster is empty")]
    EmptyRoster,
    #[error("need at least {needed} combatants, roster has {available}")]
    NotEnoughCombatants { needed: usize, available: usize },
}

pub type Result<T, E = BattleError> = std::result::Result<T, E>;
