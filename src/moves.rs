use serde::Serialize;

use crate::combatant::Combatant;
use crate::model::{EffectTarget, Move, MoveCategory, MoveEffect};
use crate::rng::RandomSource;
use crate::types::type_effectiveness;

pub const CRITICAL_CHANCE: f64 = 1.0 / 16.0;
pub const STAB_MULTIPLIER: f64 = 1.5;
const JITTER_MIN: f64 = 0.85;
const JITTER_SPAN: f64 = 0.15;

/// Outcome of one move execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveResult {
    pub move_used: String,
    pub hit: bool,
    pub damage: u32,
    pub critical: bool,
    pub effectiveness: f64,
    pub message: String,
}

/// Level-scaled damage before critical hits and type effectiveness.
///
/// Real-valued throughout, floored once at the end.
pub fn damage_formula(
    level: u32,
    power: u32,
    attack: u32,
    defense: u32,
    jitter: f64,
    stab: f64,
) -> u32 {
    let level = level as f64;
    let scaled = (2.0 * level / 5.0 + 2.0) * power as f64 * attack as f64 / defense.max(1) as f64;
    let base = scaled / 50.0 + 2.0;
    (base * jitter * stab).floor() as u32
}

impl Move {
    /// Resolves this move from `attacker` against `defender`.
    ///
    /// Draws from `rng` in a fixed order: hit roll, then (damaging moves only)
    /// damage jitter and critical roll.
    pub fn execute(
        &self,
        attacker: &mut Combatant,
        defender: &mut Combatant,
        rng: &mut impl RandomSource,
    ) -> MoveResult {
        let mut result = MoveResult {
            move_used: self.name.clone(),
            hit: false,
            damage: 0,
            critical: false,
            effectiveness: 1.0,
            message: format!("{} used {}!", attacker.name, self.name),
        };

        let hit_roll = rng.next_f64() * 100.0;
        if hit_roll > self.accuracy {
            result.message.push_str(" But it missed!");
            tracing::debug!(
                attacker = %attacker.name,
                move_name = %self.name,
                hit_roll,
                "move missed"
            );
            return result;
        }
        result.hit = true;

        if self.category == MoveCategory::Status {
            self.apply_effect(attacker, defender, &mut result);
            return result;
        }

        if self.power > 0 {
            let jitter = JITTER_MIN + rng.next_f64() * JITTER_SPAN;
            let stab = if attacker.has_type(self.move_type) {
                STAB_MULTIPLIER
            } else {
                1.0
            };
            result.damage = damage_formula(
                attacker.level,
                self.power,
                attacker.attack(),
                defender.defense(),
                jitter,
                stab,
            );

            result.critical = rng.next_f64() < CRITICAL_CHANCE;
            if result.critical {
                result.damage = result.damage.saturating_mul(2);
                result.message.push_str(" A critical hit!");
            }

            result.effectiveness = type_effectiveness(self.move_type, &defender.types());
            result.damage = (result.damage as f64 * result.effectiveness).floor() as u32;

            if result.effectiveness > 1.0 {
                result.message.push_str(" It's super effective!");
            } else if result.effectiveness > 0.0 && result.effectiveness < 1.0 {
                result.message.push_str(" It's not very effective...");
            } else if result.effectiveness == 0.0 {
                result
                    .message
                    .push_str(&format!(" It doesn't affect {}...", defender.name));
            }

            defender.take_damage(result.damage);
            tracing::debug!(
                attacker = %attacker.name,
                defender = %defender.name,
                move_name = %self.name,
                damage = result.damage,
                critical = result.critical,
                effectiveness = result.effectiveness,
                "move hit"
            );
        }

        self.apply_effect(attacker, defender, &mut result);
        result
    }

    fn apply_effect(
        &self,
        attacker: &mut Combatant,
        defender: &mut Combatant,
        result: &mut MoveResult,
    ) {
        match self.effect {
            MoveEffect::None => {}
            MoveEffect::InflictStatus { status } => {
                if defender.status.is_none() && defender.can_battle() {
                    defender.status = Some(status);
                    result
                        .message
                        .push_str(&format!(" {} {}!", defender.name, status.inflicted_verb()));
                }
            }
            MoveEffect::Heal { amount } => {
                let before = attacker.hp();
                attacker.heal(amount);
                let restored = attacker.hp() - before;
                if restored > 0 {
                    result
                        .message
                        .push_str(&format!(" {} restored {} HP!", attacker.name, restored));
                }
            }
            MoveEffect::StatModifier {
                target,
                stat,
                stages,
            } => {
                let affected = match target {
                    EffectTarget::User => attacker,
                    EffectTarget::Target => defender,
                };
                let applied = affected.modify_stage(stat, stages);
                let phrase = match applied {
                    0 if stages > 0 => "won't go any higher",
                    0 => "won't go any lower",
                    d if d >= 2 => "rose sharply",
                    d if d > 0 => "rose",
                    d if d <= -2 => "harshly fell",
                    _ => "fell",
                };
                result
                    .message
                    .push_str(&format!(" {}'s {} {}!", affected.name, stat, phrase));
            }
        }
    }
}
