use std::sync::Arc;

use crate::error::{BattleError, Result};
use crate::model::{BaseStats, BattleStat, CombatantTemplate, Move, StatusCondition};
use crate::moves::MoveResult;
use crate::rng::RandomSource;
use crate::types::ElementType;

pub const MAX_STAGE: i8 = 6;

/// Stats derived from base stats and level at creation. Never changes.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DerivedStats {
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl DerivedStats {
    /// Computed in `u64` and saturated, so oversized roster stats cap at `u32::MAX`.
    pub fn from_base(base: &BaseStats, level: u32) -> Self {
        let level = u64::from(level);
        let scaled = |value: u32| (2 * u64::from(value) + 31).saturating_mul(level) / 100;
        let other = |value: u32| saturate(scaled(value) + 5);
        Self {
            max_hp: saturate(scaled(base.hp).saturating_add(level + 10)),
            attack: other(base.attack),
            defense: other(base.defense),
            speed: other(base.speed),
        }
    }
}

/// A battle participant. Built fresh (full hp) for every battle.
#[derive(Debug, Clone)]
pub struct Combatant {
    pub name: String,
    pub level: u32,
    primary_type: ElementType,
    secondary_type: Option<ElementType>,
    base_stats: BaseStats,
    stats: DerivedStats,
    hp: u32,
    fainted: bool,
    pub status: Option<StatusCondition>,
    // attack, defense, speed
    stages: [i8; 3],
    moves: Vec<Arc<Move>>,
}

impl Combatant {
    pub fn new(
        name: impl Into<String>,
        primary_type: ElementType,
        secondary_type: Option<ElementType>,
        base_stats: BaseStats,
        moves: Vec<Arc<Move>>,
        level: u32,
    ) -> Self {
        let stats = DerivedStats::from_base(&base_stats, level);
        Self {
            name: name.into(),
            level,
            primary_type,
            secondary_type,
            base_stats,
            stats,
            hp: stats.max_hp,
            fainted: false,
            status: None,
            stages: [0; 3],
            moves,
        }
    }

    pub fn types(&self) -> Vec<ElementType> {
        match self.secondary_type {
            Some(secondary) => vec![self.primary_type, secondary],
            None => vec![self.primary_type],
        }
    }

    pub fn has_type(&self, element: ElementType) -> bool {
        self.primary_type == element || self.secondary_type == Some(element)
    }

    pub fn type_label(&self) -> String {
        match self.secondary_type {
            Some(secondary) => format!("{}/{}", self.primary_type, secondary),
            None => self.primary_type.to_string(),
        }
    }

    pub fn base_stats(&self) -> &BaseStats {
        &self.base_stats
    }

    pub fn stats(&self) -> &DerivedStats {
        &self.stats
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.max_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.fainted
    }

    pub fn moves(&self) -> &[Arc<Move>] {
        &self.moves
    }

    pub fn attack(&self) -> u32 {
        apply_stage(self.stats.attack, self.stage(BattleStat::Attack))
    }

    pub fn defense(&self) -> u32 {
        apply_stage(self.stats.defense, self.stage(BattleStat::Defense))
    }

    pub fn speed(&self) -> u32 {
        apply_stage(self.stats.speed, self.stage(BattleStat::Speed))
    }

    pub fn stage(&self, stat: BattleStat) -> i8 {
        self.stages[stage_slot(stat)]
    }

    /// Shifts a stat stage, clamped to ±6. Returns the change actually applied.
    pub fn modify_stage(&mut self, stat: BattleStat, delta: i8) -> i8 {
        let slot = &mut self.stages[stage_slot(stat)];
        let before = *slot;
        *slot = before.saturating_add(delta).clamp(-MAX_STAGE, MAX_STAGE);
        *slot - before
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.fainted = true;
        }
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.stats.max_hp);
        if self.hp > 0 {
            self.fainted = false;
        }
    }

    pub fn can_battle(&self) -> bool {
        !self.fainted && self.hp > 0
    }

    pub fn use_move(
        &mut self,
        index: usize,
        target: &mut Combatant,
        rng: &mut impl RandomSource,
    ) -> Result<MoveResult> {
        let Some(selected) = self.moves.get(index).cloned() else {
            return Err(BattleError::InvalidMoveIndex {
                combatant: self.name.clone(),
                index,
                len: self.moves.len(),
            });
        };
        Ok(selected.execute(self, target, rng))
    }

    pub fn hp_percentage(&self) -> u32 {
        (100.0 * self.hp as f64 / self.stats.max_hp as f64).round() as u32
    }

    /// Multi-line display block: name, level, hp bar, types and status.
    pub fn status_block(&self) -> String {
        let filled = (self.hp_percentage() / 5).min(20) as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled));
        let status = self
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "Normal".to_string());
        format!(
            "{} (Lv.{})\nHP: {}/{} [{}] {}%\nType: {}\nStatus: {}",
            self.name,
            self.level,
            self.hp,
            self.stats.max_hp,
            bar,
            self.hp_percentage(),
            self.type_label(),
            status
        )
    }
}

impl CombatantTemplate {
    /// Fresh battle-ready copy with full hp. Moves stay shared with the template.
    pub fn instantiate(&self) -> Combatant {
        Combatant::new(
            self.name.clone(),
            self.primary_type,
            self.secondary_type,
            self.base_stats,
            self.moves.clone(),
            self.level,
        )
    }

    pub fn derived_stats(&self) -> DerivedStats {
        DerivedStats::from_base(&self.base_stats, self.level)
    }
}

fn stage_slot(stat: BattleStat) -> usize {
    match stat {
        BattleStat::Attack => 0,
        BattleStat::Defense => 1,
        BattleStat::Speed => 2,
    }
}

fn apply_stage(value: u32, stage: i8) -> u32 {
    let stage = i64::from(stage);
    let numerator = (2 + stage).max(2) as u64;
    let denominator = (2 - stage).max(2) as u64;
    saturate(u64::from(value) * numerator / denominator)
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pikachu() -> Combatant {
        Combatant::new(
            "Pikachu",
            ElementType::Electric,
            None,
            BaseStats {
                hp: 35,
                attack: 55,
                defense: 40,
                speed: 90,
            },
            Vec::new(),
            25,
        )
    }

    #[test]
    fn derives_stats_from_level() {
        let mon = pikachu();
        assert_eq!(
            *mon.stats(),
            DerivedStats {
                max_hp: 60,
                attack: 40,
                defense: 32,
                speed: 57,
            }
        );
        assert_eq!(mon.hp(), mon.max_hp());
        assert!(mon.can_battle());
    }

    #[test]
    fn hp_stays_in_range_and_tracks_fainted() {
        let mut mon = pikachu();
        mon.take_damage(20);
        assert_eq!(mon.hp(), 40);
        assert!(!mon.is_fainted());

        mon.heal(1000);
        assert_eq!(mon.hp(), mon.max_hp());

        mon.take_damage(u32::MAX);
        assert_eq!(mon.hp(), 0);
        assert!(mon.is_fainted());
        assert!(!mon.can_battle());

        mon.take_damage(5);
        assert_eq!(mon.hp(), 0);

        mon.heal(0);
        assert!(mon.is_fainted());
        mon.heal(1);
        assert_eq!(mon.hp(), 1);
        assert!(!mon.is_fainted());
        assert!(mon.can_battle());
    }

    #[test]
    fn damage_and_heal_are_monotonic() {
        let mut mon = pikachu();
        let mut last = mon.hp();
        for amount in [0, 3, 7, 11, 50] {
            mon.take_damage(amount);
            assert!(mon.hp() <= last);
            last = mon.hp();
        }
        for amount in [0, 4, 9, 100] {
            mon.heal(amount);
            assert!(mon.hp() >= last);
            assert!(mon.hp() <= mon.max_hp());
            last = mon.hp();
        }
    }

    #[test]
    fn stages_clamp_and_scale() {
        let mut mon = pikachu();
        assert_eq!(mon.modify_stage(BattleStat::Attack, 4), 4);
        assert_eq!(mon.modify_stage(BattleStat::Attack, 4), 2);
        assert_eq!(mon.stage(BattleStat::Attack), 6);
        assert_eq!(mon.attack(), 40 * 8 / 2);
        assert_eq!(mon.modify_stage(BattleStat::Speed, -1), -1);
        assert_eq!(mon.speed(), 57 * 2 / 3);
        assert_eq!(mon.stats().attack, 40);
    }

    #[test]
    fn status_block_shows_bar_and_types() {
        let mut mon = pikachu();
        mon.take_damage(30);
        let block = mon.status_block();
        assert_eq!(
            block,
            format!(
                "Pikachu (Lv.25)\nHP: 30/60 [{}{}] 50%\nType: electric\nStatus: Normal",
                "█".repeat(10),
                "░".repeat(10)
            )
        );
    }

    #[test]
    fn empty_move_list_rejects_every_index() {
        let mut mon = pikachu();
        let mut target = pikachu();
        let mut rng = crate::rng::ScriptedRandom::constant(0.0);
        let err = mon.use_move(0, &mut target, &mut rng).unwrap_err();
        assert_eq!(
            err,
            BattleError::InvalidMoveIndex {
                combatant: "Pikachu".to_string(),
                index: 0,
                len: 0,
            }
        );
    }
}
