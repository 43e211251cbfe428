use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use crate::battle::{Battle, BattleOptions, BattleOutcome, SideId};
use crate::error::{BattleError, Result};
use crate::model::CombatantTemplate;
use crate::roster::Roster;
use crate::rng::SeededRandom;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Standing {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub battles: u32,
}

impl Standing {
    pub fn win_rate(&self) -> f64 {
        if self.battles == 0 {
            return 0.0;
        }
        self.wins as f64 / self.battles as f64
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pairing {
    pub round: u32,
    pub side_one: String,
    pub side_two: String,
    /// Name of the winning combatant, `None` if the turn cap was hit.
    pub winner: Option<String>,
    pub turns: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TournamentReport {
    pub rounds: u32,
    pub pairings: Vec<Pairing>,
    /// Sorted by win rate, best first.
    pub standings: Vec<Standing>,
}

// side-one index, side-two index, outcome, record
type RoundResult = (usize, usize, BattleOutcome, Pairing);

fn battle_seed(seed: u64, round: u64, slot: u64) -> u64 {
    seed ^ (round << 32) ^ slot
}

/// Runs one battle between fresh copies of two templates.
pub fn simulate_pair(
    side_one: &CombatantTemplate,
    side_two: &CombatantTemplate,
    seed: u64,
    options: &BattleOptions,
) -> Result<(BattleOutcome, u32)> {
    let mut battle = Battle::with_rng(
        side_one.instantiate(),
        side_two.instantiate(),
        options.clone(),
        SeededRandom::new(seed),
    );
    let outcome = battle.run()?;
    Ok((outcome, battle.turn()))
}

/// Every round shuffles the roster and pairs neighbours; an odd one out sits
/// the round. Pairings inside a round run in parallel.
pub fn run_tournament(
    roster: &Roster,
    rounds: u32,
    seed: u64,
    options: &BattleOptions,
) -> Result<TournamentReport> {
    if roster.len() < 2 {
        return Err(BattleError::NotEnoughCombatants {
            needed: 2,
            available: roster.len(),
        });
    }
    let mut shuffle_rng = SmallRng::seed_from_u64(seed);
    let templates = roster.templates();
    // Indexed like the roster, so same-named templates keep separate rows.
    let mut standings: Vec<Standing> = templates
        .iter()
        .map(|t| Standing {
            name: t.name.clone(),
            ..Standing::default()
        })
        .collect();
    let mut pairings = Vec::new();

    for round in 1..=rounds {
        let mut order: Vec<usize> = (0..templates.len()).collect();
        order.shuffle(&mut shuffle_rng);
        let matches: Vec<(usize, usize, usize)> = order
            .chunks_exact(2)
            .enumerate()
            .map(|(slot, pair)| (slot, pair[0], pair[1]))
            .collect();

        let results: Vec<Result<RoundResult>> = matches
            .par_iter()
            .map(|&(slot, one_idx, two_idx)| -> Result<RoundResult> {
                let (one, two) = (&templates[one_idx], &templates[two_idx]);
                let (outcome, turns) = simulate_pair(
                    one,
                    two,
                    battle_seed(seed, round as u64, slot as u64),
                    options,
                )?;
                let winner = match outcome {
                    BattleOutcome::Winner(SideId::One) => Some(one.name.clone()),
                    BattleOutcome::Winner(SideId::Two) => Some(two.name.clone()),
                    BattleOutcome::TurnLimit => None,
                };
                let pairing = Pairing {
                    round,
                    side_one: one.name.clone(),
                    side_two: two.name.clone(),
                    winner,
                    turns,
                };
                Ok((one_idx, two_idx, outcome, pairing))
            })
            .collect();

        for result in results {
            let (one_idx, two_idx, outcome, pairing) = result?;
            tally(&mut standings, one_idx, two_idx, outcome);
            tracing::debug!(
                round,
                side_one = %pairing.side_one,
                side_two = %pairing.side_two,
                winner = pairing.winner.as_deref().unwrap_or("draw"),
                "tournament battle finished"
            );
            pairings.push(pairing);
        }
    }

    standings.sort_by(|lhs, rhs| {
        rhs.win_rate()
            .total_cmp(&lhs.win_rate())
            .then_with(|| lhs.name.cmp(&rhs.name))
    });
    Ok(TournamentReport {
        rounds,
        pairings,
        standings,
    })
}

fn tally(standings: &mut [Standing], one_idx: usize, two_idx: usize, outcome: BattleOutcome) {
    standings[one_idx].battles += 1;
    standings[two_idx].battles += 1;
    match outcome {
        BattleOutcome::Winner(SideId::One) => {
            standings[one_idx].wins += 1;
            standings[two_idx].losses += 1;
        }
        BattleOutcome::Winner(SideId::Two) => {
            standings[one_idx].losses += 1;
            standings[two_idx].wins += 1;
        }
        BattleOutcome::TurnLimit => {
            standings[one_idx].draws += 1;
            standings[two_idx].draws += 1;
        }
    }
}

/// Side-one win rate for every ordered pair of templates; draws count half.
pub fn win_rate_matrix(
    roster: &Roster,
    sims_per_cell: usize,
    seed: u64,
    options: &BattleOptions,
) -> Result<Vec<Vec<f64>>> {
    let templates = roster.templates();
    let tasks: Vec<(usize, usize)> = (0..templates.len())
        .flat_map(|a| (0..templates.len()).map(move |b| (a, b)))
        .collect();
    let cell_results: Vec<Result<CellResult>> = tasks
        .par_iter()
        .map(|&(a_idx, b_idx)| -> Result<CellResult> {
            let mut cell_rng =
                SmallRng::seed_from_u64(battle_seed(seed, a_idx as u64, b_idx as u64));
            let mut one_wins = 0u64;
            let mut draws = 0u64;
            for _ in 0..sims_per_cell {
                let (outcome, _) =
                    simulate_pair(&templates[a_idx], &templates[b_idx], cell_rng.gen(), options)?;
                match outcome {
                    BattleOutcome::Winner(SideId::One) => one_wins += 1,
                    BattleOutcome::Winner(SideId::Two) => {}
                    BattleOutcome::TurnLimit => draws += 1,
                }
            }
            let win_rate = if sims_per_cell == 0 {
                0.0
            } else {
                (one_wins as f64 + 0.5 * draws as f64) / sims_per_cell as f64
            };
            Ok(CellResult {
                a_idx,
                b_idx,
                win_rate,
            })
        })
        .collect();

    let mut matrix = vec![vec![0.0; templates.len()]; templates.len()];
    for cell in cell_results {
        let cell = cell?;
        matrix[cell.a_idx][cell.b_idx] = cell.win_rate;
    }
    Ok(matrix)
}

struct CellResult {
    a_idx: usize,
    b_idx: usize,
    win_rate: f64,
}

/// Writes the matrix with a header row and a leading name column.
pub fn write_csv(
    matrix: &[Vec<f64>],
    names: &[&str],
    path: &std::path::Path,
) -> anyhow::Result<()> {
    let mut out = String::from("side_one");
    for name in names {
        out.push(',');
        out.push_str(name);
    }
    for (row_idx, row) in matrix.iter().enumerate() {
        out.push('\n');
        out.push_str(names.get(row_idx).copied().unwrap_or(""));
        for value in row {
            out.push_str(&format!(",{value:.4}"));
        }
    }
    out.push('\n');
    std::fs::write(path, out)?;
    Ok(())
}
