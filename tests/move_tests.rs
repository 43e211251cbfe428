use creature_battle::combatant::Combatant;
use creature_battle::model::{
    BaseStats, BattleStat, EffectTarget, Move, MoveCategory, MoveEffect, StatusCondition,
};
use creature_battle::moves::damage_formula;
use creature_battle::rng::ScriptedRandom;
use creature_battle::types::ElementType;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn make_move(name: &str, move_type: ElementType, power: u32, accuracy: f64) -> Move {
    let category = if power == 0 {
        MoveCategory::Status
    } else {
        MoveCategory::Physical
    };
    Move::new(name, move_type, power, accuracy, category, "")
}

// Level 50 with base attack 80 derives attack 100; base defense 30 derives defense 50.
fn make_mon(name: &str, types: &[ElementType], moves: Vec<Move>) -> Combatant {
    Combatant::new(
        name,
        types[0],
        types.get(1).copied(),
        BaseStats {
            hp: 100,
            attack: 80,
            defense: 30,
            speed: 50,
        },
        moves.into_iter().map(Arc::new).collect(),
        50,
    )
}

// hit roll, damage jitter (0.85), critical roll (no crit)
fn plain_hit() -> ScriptedRandom {
    ScriptedRandom::new([0.0, 0.0, 0.5])
}

#[test]
fn derived_stats_match_fixture() {
    let mon = make_mon("Fixture", &[ElementType::Normal], vec![]);
    assert_eq!(mon.attack(), 100);
    assert_eq!(mon.defense(), 50);
    assert_eq!(mon.max_hp(), 175);
}

#[test]
fn damage_formula_reproduces_exactly() {
    // ((((2*50/5+2)*40*100/50)/50)+2) = 37.2, then floor(37.2 * 0.85)
    assert_eq!(damage_formula(50, 40, 100, 50, 0.85, 1.0), 31);
    assert_eq!(damage_formula(50, 40, 100, 50, 0.85, 1.5), 47);
    assert_eq!(damage_formula(50, 40, 100, 50, 1.0, 1.0), 37);
}

#[test]
fn full_accuracy_always_hits() {
    let tackle = make_move("Tackle", ElementType::Normal, 40, 100.0);
    for roll in [0.0, 0.25, 0.5, 0.99] {
        let mut attacker = make_mon("Attacker", &[ElementType::Fire], vec![]);
        let mut defender = make_mon("Defender", &[ElementType::Water], vec![]);
        let mut rng = ScriptedRandom::new([roll, 0.0, 0.5]);
        let result = tackle.execute(&mut attacker, &mut defender, &mut rng);
        assert!(result.hit, "roll {roll} should hit");
    }
}

#[test]
fn neutral_hit_applies_formula_damage() {
    let tackle = make_move("Tackle", ElementType::Normal, 40, 100.0);
    let mut attacker = make_mon("Attacker", &[ElementType::Fire], vec![]);
    let mut defender = make_mon("Defender", &[ElementType::Water], vec![]);
    let result = tackle.execute(&mut attacker, &mut defender, &mut plain_hit());

    assert_eq!(result.damage, 31);
    assert!(!result.critical);
    assert_eq!(result.effectiveness, 1.0);
    assert_eq!(result.message, "Attacker used Tackle!");
    assert_eq!(defender.hp(), 175 - 31);
}

#[test]
fn same_type_bonus_applies() {
    let tackle = make_move("Tackle", ElementType::Normal, 40, 100.0);
    let mut attacker = make_mon("Attacker", &[ElementType::Fire, ElementType::Normal], vec![]);
    let mut defender = make_mon("Defender", &[ElementType::Water], vec![]);
    let result = tackle.execute(&mut attacker, &mut defender, &mut plain_hit());
    assert_eq!(result.damage, 47);
}

#[test]
fn critical_hit_doubles_damage() {
    let tackle = make_move("Tackle", ElementType::Normal, 40, 100.0);
    let mut attacker = make_mon("Attacker", &[ElementType::Fire], vec![]);
    let mut defender = make_mon("Defender", &[ElementType::Water], vec![]);
    let mut rng = ScriptedRandom::new([0.0, 0.0, 0.0]);
    let result = tackle.execute(&mut attacker, &mut defender, &mut rng);
    assert!(result.critical);
    assert_eq!(result.damage, 62);
    assert_eq!(result.message, "Attacker used Tackle! A critical hit!");
}

#[test]
fn miss_leaves_defender_untouched() {
    let shaky = make_move("Shaky", ElementType::Normal, 40, 50.0);
    let mut attacker = make_mon("Attacker", &[ElementType::Fire], vec![]);
    let mut defender = make_mon("Defender", &[ElementType::Water], vec![]);
    let mut rng = ScriptedRandom::new([0.9, 0.0, 0.0]);
    let result = shaky.execute(&mut attacker, &mut defender, &mut rng);

    assert!(!result.hit);
    assert_eq!(result.damage, 0);
    assert_eq!(result.message, "Attacker used Shaky! But it missed!");
    assert_eq!(defender.hp(), defender.max_hp());
    assert_eq!(rng.draws(), 1);
}

#[test]
fn roll_equal_to_accuracy_connects() {
    let shaky = make_move("Shaky", ElementType::Normal, 40, 50.0);
    let mut attacker = make_mon("Attacker", &[ElementType::Fire], vec![]);
    let mut defender = make_mon("Defender", &[ElementType::Water], vec![]);
    let mut rng = ScriptedRandom::new([0.5, 0.0, 0.5]);
    assert!(shaky.execute(&mut attacker, &mut defender, &mut rng).hit);
}

#[test]
fn effectiveness_scales_damage_and_message() {
    let ember = make_move("Ember", ElementType::Fire, 40, 100.0);
    let mut attacker = make_mon("Blaze", &[ElementType::Fire], vec![]);

    let mut leafy = make_mon("Leafy", &[ElementType::Grass, ElementType::Poison], vec![]);
    let result = ember.execute(&mut attacker, &mut leafy, &mut plain_hit());
    assert_eq!(result.effectiveness, 2.0);
    assert_eq!(result.damage, 94);
    assert!(result.message.ends_with("It's super effective!"));

    let mut splash = make_mon("Splash", &[ElementType::Water], vec![]);
    let result = ember.execute(&mut attacker, &mut splash, &mut plain_hit());
    assert_eq!(result.effectiveness, 0.5);
    assert_eq!(result.damage, 23);
    assert!(result.message.ends_with("It's not very effective..."));
}

#[test]
fn immune_defender_takes_nothing() {
    let spark = make_move("Spark", ElementType::Electric, 65, 100.0);
    let mut attacker = make_mon("Sparky", &[ElementType::Electric], vec![]);
    let mut defender = make_mon("Rocky", &[ElementType::Rock, ElementType::Ground], vec![]);
    let result = spark.execute(&mut attacker, &mut defender, &mut plain_hit());

    assert!(result.hit);
    assert_eq!(result.effectiveness, 0.0);
    assert_eq!(result.damage, 0);
    assert!(result.message.ends_with("It doesn't affect Rocky..."));
    assert_eq!(defender.hp(), defender.max_hp());
}

#[test]
fn status_move_skips_damage_and_inflicts() {
    let will_o_wisp = make_move("Will-O-Wisp", ElementType::Fire, 0, 100.0).with_effect(
        MoveEffect::InflictStatus {
            status: StatusCondition::Burn,
        },
    );
    let mut attacker = make_mon("Attacker", &[ElementType::Fire], vec![]);
    let mut defender = make_mon("Defender", &[ElementType::Water], vec![]);
    let mut rng = plain_hit();
    let result = will_o_wisp.execute(&mut attacker, &mut defender, &mut rng);

    assert!(result.hit);
    assert_eq!(result.damage, 0);
    assert_eq!(defender.status, Some(StatusCondition::Burn));
    assert_eq!(defender.hp(), defender.max_hp());
    assert_eq!(result.message, "Attacker used Will-O-Wisp! Defender was burned!");
    assert_eq!(rng.draws(), 1);

    // An existing condition is not replaced.
    let toxic = make_move("Toxic", ElementType::Poison, 0, 100.0).with_effect(
        MoveEffect::InflictStatus {
            status: StatusCondition::Poison,
        },
    );
    toxic.execute(&mut attacker, &mut defender, &mut plain_hit());
    assert_eq!(defender.status, Some(StatusCondition::Burn));
}

#[test]
fn knocked_out_defender_gets_no_status() {
    let flame_tackle = make_move("Flame Tackle", ElementType::Normal, 40, 100.0).with_effect(
        MoveEffect::InflictStatus {
            status: StatusCondition::Burn,
        },
    );
    let mut attacker = make_mon("Attacker", &[ElementType::Water], vec![]);
    let mut defender = make_mon("Defender", &[ElementType::Water], vec![]);
    defender.take_damage(defender.max_hp() - 1);
    let result = flame_tackle.execute(&mut attacker, &mut defender, &mut plain_hit());

    assert_eq!(result.damage, 31);
    assert!(!defender.can_battle());
    assert_eq!(defender.status, None);
    assert_eq!(result.message, "Attacker used Flame Tackle!");
}

#[test]
fn heal_effect_restores_attacker() {
    let drain = make_move("Drain", ElementType::Grass, 40, 100.0)
        .with_effect(MoveEffect::Heal { amount: 20 });
    let mut attacker = make_mon("Attacker", &[ElementType::Fire], vec![]);
    let mut defender = make_mon("Defender", &[ElementType::Water], vec![]);
    attacker.take_damage(50);
    let result = drain.execute(&mut attacker, &mut defender, &mut plain_hit());

    assert_eq!(attacker.hp(), 175 - 50 + 20);
    assert!(result.message.ends_with("Attacker restored 20 HP!"));
}

#[test]
fn stat_modifier_changes_stages_not_base_stats() {
    let growl = make_move("Growl", ElementType::Normal, 0, 100.0).with_effect(
        MoveEffect::StatModifier {
            target: EffectTarget::Target,
            stat: BattleStat::Attack,
            stages: -1,
        },
    );
    let swords = make_move("Swords Dance", ElementType::Normal, 0, 100.0).with_effect(
        MoveEffect::StatModifier {
            target: EffectTarget::User,
            stat: BattleStat::Attack,
            stages: 2,
        },
    );
    let mut attacker = make_mon("Attacker", &[ElementType::Fire], vec![]);
    let mut defender = make_mon("Defender", &[ElementType::Water], vec![]);

    let result = growl.execute(&mut attacker, &mut defender, &mut plain_hit());
    assert_eq!(defender.stage(BattleStat::Attack), -1);
    assert_eq!(defender.attack(), 66);
    assert_eq!(defender.stats().attack, 100);
    assert!(result.message.ends_with("Defender's Attack fell!"));

    let result = swords.execute(&mut attacker, &mut defender, &mut plain_hit());
    assert_eq!(attacker.attack(), 200);
    assert!(result.message.ends_with("Attacker's Attack rose sharply!"));
}

#[test]
fn use_move_rejects_out_of_range_index() {
    let mut attacker = make_mon(
        "Attacker",
        &[ElementType::Fire],
        vec![make_move("Tackle", ElementType::Normal, 40, 100.0)],
    );
    let mut defender = make_mon("Defender", &[ElementType::Water], vec![]);
    let err = attacker
        .use_move(1, &mut defender, &mut plain_hit())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid move index 1 for Attacker (knows 1 moves)"
    );
    assert!(attacker.use_move(0, &mut defender, &mut plain_hit()).is_ok());
}
