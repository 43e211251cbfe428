use serde::{Deserialize, Serialize};

use crate::battle_logger::BattleLogger;
use crate::combatant::Combatant;
use crate::error::{BattleError, Result};
use crate::moves::MoveResult;
use crate::rng::{RandomSource, SeededRandom};

pub const DEFAULT_MAX_TURNS: u32 = 500;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SideId {
    One,
    Two,
}

impl SideId {
    pub fn opponent(self) -> SideId {
        match self {
            SideId::One => SideId::Two,
            SideId::Two => SideId::One,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BattlePhase {
    NotStarted,
    InProgress,
    Finished,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum BattleOutcome {
    Winner(SideId),
    /// The turn cap ran out before either combatant fainted.
    TurnLimit,
}

fn default_max_turns() -> Option<u32> {
    Some(DEFAULT_MAX_TURNS)
}

fn default_side_one() -> String {
    "Player 1".to_string()
}

fn default_side_two() -> String {
    "Player 2".to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOptions {
    /// Exchanges allowed before the battle is called off. `None` or `Some(0)`
    /// runs until a faint.
    #[serde(default = "default_max_turns")]
    pub max_turns: Option<u32>,
    #[serde(default = "default_side_one")]
    pub side_one_name: String,
    #[serde(default = "default_side_two")]
    pub side_two_name: String,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            side_one_name: default_side_one(),
            side_two_name: default_side_two(),
        }
    }
}

/// One executed move, kept for consumers that want structured telemetry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MoveRecord {
    pub turn: u32,
    pub side: SideId,
    pub combatant: String,
    pub result: MoveResult,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BattleSummary {
    pub winner: Option<String>,
    pub outcome: Option<BattleOutcome>,
    pub turns: u32,
    pub log: Vec<String>,
    pub moves: Vec<MoveRecord>,
}

#[derive(Clone, Debug)]
struct BattleSide {
    name: String,
    active: Combatant,
}

/// A single-use battle between two one-combatant sides.
pub struct Battle<R = SeededRandom> {
    side_one: BattleSide,
    side_two: BattleSide,
    turn: u32,
    phase: BattlePhase,
    outcome: Option<BattleOutcome>,
    failure: Option<BattleError>,
    max_turns: Option<u32>,
    logger: BattleLogger,
    records: Vec<MoveRecord>,
    rng: R,
}

impl Battle<SeededRandom> {
    /// Battle with default options and an entropy-seeded random source.
    pub fn new(side_one: Combatant, side_two: Combatant) -> Self {
        Self::with_rng(
            side_one,
            side_two,
            BattleOptions::default(),
            SeededRandom::from_entropy(),
        )
    }

    pub fn with_seed(side_one: Combatant, side_two: Combatant, seed: u64) -> Self {
        Self::with_rng(
            side_one,
            side_two,
            BattleOptions::default(),
            SeededRandom::new(seed),
        )
    }
}

impl<R: RandomSource> Battle<R> {
    pub fn with_rng(
        side_one: Combatant,
        side_two: Combatant,
        options: BattleOptions,
        rng: R,
    ) -> Self {
        Battle {
            side_one: BattleSide {
                name: options.side_one_name,
                active: side_one,
            },
            side_two: BattleSide {
                name: options.side_two_name,
                active: side_two,
            },
            turn: 1,
            phase: BattlePhase::NotStarted,
            outcome: None,
            failure: None,
            max_turns: options.max_turns.filter(|&cap| cap > 0),
            logger: BattleLogger::new().with_echo(true),
            records: Vec::new(),
            rng,
        }
    }

    fn side(&self, side: SideId) -> &BattleSide {
        match side {
            SideId::One => &self.side_one,
            SideId::Two => &self.side_two,
        }
    }

    pub fn side_name(&self, side: SideId) -> &str {
        &self.side(side).name
    }

    pub fn combatant(&self, side: SideId) -> &Combatant {
        &self.side(side).active
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<&str> {
        match self.outcome {
            Some(BattleOutcome::Winner(side)) => Some(self.side_name(side)),
            _ => None,
        }
    }

    pub fn log(&self) -> &[String] {
        self.logger.log_lines()
    }

    pub fn logger(&self) -> &BattleLogger {
        &self.logger
    }

    pub fn move_records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Side that acts first this turn. Ties go to side one.
    pub fn turn_order(&self) -> (SideId, SideId) {
        if self.side_one.active.speed() >= self.side_two.active.speed() {
            (SideId::One, SideId::Two)
        } else {
            (SideId::Two, SideId::One)
        }
    }

    /// Logs both lead combatants and moves the battle into progress.
    pub fn start(&mut self) {
        if self.phase != BattlePhase::NotStarted {
            return;
        }
        self.logger.log_start();
        self.logger
            .log_send_out(&self.side_one.name, &self.side_one.active.name);
        self.logger
            .log_send_out(&self.side_two.name, &self.side_two.active.name);
        self.logger.blank();
        tracing::info!(
            side_one = %self.side_one.active.name,
            side_two = %self.side_two.active.name,
            "battle started"
        );
        self.phase = BattlePhase::InProgress;
    }

    /// Runs one exchange and the termination check.
    ///
    /// A finished battle is left untouched. An error abandons the battle: the
    /// same error is returned by every later call.
    pub fn step(&mut self) -> Result<BattlePhase> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        match self.phase {
            BattlePhase::Finished => return Ok(BattlePhase::Finished),
            BattlePhase::NotStarted => self.start(),
            BattlePhase::InProgress => {}
        }

        if let Err(err) = self.execute_turn() {
            tracing::error!(turn = self.turn, error = %err, "battle abandoned");
            self.failure = Some(err.clone());
            return Err(err);
        }

        if self.check_battle_end() {
            return Ok(self.phase);
        }
        if self.max_turns.is_some_and(|cap| self.turn >= cap) {
            tracing::warn!(turns = self.turn, "turn cap reached without a faint");
            self.logger.log_turn_limit(self.turn);
            self.finish(BattleOutcome::TurnLimit);
            return Ok(self.phase);
        }
        self.turn += 1;
        Ok(self.phase)
    }

    /// Steps until the battle finishes.
    pub fn run(&mut self) -> Result<BattleOutcome> {
        loop {
            self.step()?;
            if let Some(outcome) = self.outcome {
                return Ok(outcome);
            }
        }
    }

    pub fn summary(&self) -> BattleSummary {
        BattleSummary {
            winner: self.winner().map(str::to_string),
            outcome: self.outcome,
            turns: self.turn,
            log: self.logger.log_lines().to_vec(),
            moves: self.records.clone(),
        }
    }

    fn execute_turn(&mut self) -> Result<()> {
        self.logger.log_turn(self.turn);
        let (first, second) = self.turn_order();
        self.act(first)?;
        self.act(second)?;

        self.logger.blank();
        self.logger.push("Current Status:");
        self.logger.push(self.side_one.active.status_block());
        self.logger.blank();
        self.logger.push(self.side_two.active.status_block());
        self.logger.blank();
        Ok(())
    }

    fn act(&mut self, side: SideId) -> Result<()> {
        let (actor, target) = match side {
            SideId::One => (&mut self.side_one.active, &mut self.side_two.active),
            SideId::Two => (&mut self.side_two.active, &mut self.side_one.active),
        };
        if !actor.can_battle() {
            return Ok(());
        }
        let index = self.rng.pick_index(actor.moves().len());
        let result = actor.use_move(index, target, &mut self.rng)?;

        self.logger.push(result.message.clone());
        if result.damage > 0 {
            self.logger.log_damage(&target.name, result.damage);
        }
        self.records.push(MoveRecord {
            turn: self.turn,
            side,
            combatant: actor.name.clone(),
            result,
        });
        Ok(())
    }

    /// Side one is inspected first, so it loses if both fainted this turn.
    fn check_battle_end(&mut self) -> bool {
        let loser = if !self.side_one.active.can_battle() {
            SideId::One
        } else if !self.side_two.active.can_battle() {
            SideId::Two
        } else {
            return false;
        };
        let fainted = self.side(loser).active.name.clone();
        self.logger.log_faint(&fainted);
        let winner = self.side(loser.opponent()).name.clone();
        self.logger.log_win(&winner);
        self.finish(BattleOutcome::Winner(loser.opponent()));
        true
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        self.outcome = Some(outcome);
        self.phase = BattlePhase::Finished;
        tracing::info!(
            turns = self.turn,
            winner = self.winner().unwrap_or("none"),
            "battle finished"
        );
    }
}
