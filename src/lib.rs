//! Turn-based creature battle engine.
//!
//! Two single-combatant sides exchange moves until one faints. The entry point
//! is [`battle::Battle`]; templates come from a [`roster::Roster`].

pub mod battle;
pub mod battle_logger;
pub mod combatant;
pub mod error;
pub mod model;
pub mod moves;
pub mod rng;
pub mod roster;
pub mod tournament;
pub mod types;

use std::path::Path;

pub use crate::error::BattleError;
use crate::roster::Roster;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::battle::{
        Battle, BattleOptions, BattleOutcome, BattlePhase, BattleSummary, MoveRecord, SideId,
    };
    pub use crate::combatant::Combatant;
    pub use crate::error::BattleError;
    pub use crate::model::{
        BaseStats, BattleStat, CombatantTemplate, EffectTarget, Move, MoveCategory, MoveEffect,
        StatusCondition,
    };
    pub use crate::moves::MoveResult;
    pub use crate::rng::{RandomSource, ScriptedRandom, SeededRandom};
    pub use crate::roster::Roster;
    pub use crate::types::ElementType;
}

/// Loads the roster at `path`, or the built-in catalog when no path is given.
pub fn load_roster(path: Option<&Path>) -> anyhow::Result<Roster> {
    match path {
        Some(path) => Roster::from_json_file(path),
        None => Ok(Roster::sample()),
    }
}
