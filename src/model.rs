use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::types::ElementType;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCondition {
    Sleep,
    Paralysis,
    Burn,
    Freeze,
    Poison,
}

impl StatusCondition {
    /// Sentence fragment used when the condition is inflicted.
    pub fn inflicted_verb(self) -> &'static str {
        match self {
            StatusCondition::Sleep => "fell asleep",
            StatusCondition::Paralysis => "is paralyzed",
            StatusCondition::Burn => "was burned",
            StatusCondition::Freeze => "was frozen solid",
            StatusCondition::Poison => "was poisoned",
        }
    }
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusCondition::Sleep => "Sleep",
            StatusCondition::Paralysis => "Paralysis",
            StatusCondition::Burn => "Burn",
            StatusCondition::Freeze => "Freeze",
            StatusCondition::Poison => "Poison",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleStat {
    Attack,
    Defense,
    Speed,
}

impl fmt::Display for BattleStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BattleStat::Attack => "Attack",
            BattleStat::Defense => "Defense",
            BattleStat::Speed => "Speed",
        };
        f.write_str(label)
    }
}

/// Which side of a move an effect lands on.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectTarget {
    User,
    Target,
}

/// Side effect applied after a move's hit/damage resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveEffect {
    #[default]
    None,
    InflictStatus { status: StatusCondition },
    Heal { amount: u32 },
    StatModifier {
        target: EffectTarget,
        stat: BattleStat,
        stages: i8,
    },
}

fn default_accuracy() -> f64 {
    100.0
}

fn default_level() -> u32 {
    50
}

/// Immutable move definition, shared by reference across combatants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: ElementType,
    #[serde(default)]
    pub power: u32,
    /// Percentage chance to connect, 0..=100.
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,
    pub category: MoveCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effect: MoveEffect,
}

impl Move {
    pub fn new(
        name: impl Into<String>,
        move_type: ElementType,
        power: u32,
        accuracy: f64,
        category: MoveCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            move_type,
            power,
            accuracy,
            category,
            description: description.into(),
            effect: MoveEffect::None,
        }
    }

    pub fn with_effect(mut self, effect: MoveEffect) -> Self {
        self.effect = effect;
        self
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

/// Species template handed out by a roster provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantTemplate {
    pub name: String,
    pub primary_type: ElementType,
    #[serde(default)]
    pub secondary_type: Option<ElementType>,
    pub base_stats: BaseStats,
    pub moves: Vec<Arc<Move>>,
    #[serde(default = "default_level")]
    pub level: u32,
}
