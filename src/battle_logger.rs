use serde_json::json;

pub const RULE_WIDTH: usize = 50;

/// Append-only, human-readable battle log.
#[derive(Clone, Debug, Default)]
pub struct BattleLogger {
    format: String,
    log: Vec<String>,
    echo: bool,
}

impl BattleLogger {
    pub fn new() -> Self {
        Self {
            format: "singles".to_string(),
            log: Vec::new(),
            echo: false,
        }
    }

    /// Mirror every line to `tracing` at trace level as it is logged.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        if self.echo {
            tracing::trace!(target: "battle_log", "{line}");
        }
        self.log.push(line);
    }

    pub fn blank(&mut self) {
        self.push("");
    }

    pub fn rule(&mut self) {
        self.push("=".repeat(RULE_WIDTH));
    }

    pub fn log_start(&mut self) {
        self.push("BATTLE BEGINS!");
        self.rule();
    }

    pub fn log_send_out(&mut self, side: &str, combatant: &str) {
        self.push(format!("{side} sends out {combatant}!"));
    }

    pub fn log_turn(&mut self, turn: u32) {
        self.push(format!("--- Turn {turn} ---"));
    }

    pub fn log_damage(&mut self, target: &str, damage: u32) {
        self.push(format!("{target} takes {damage} damage!"));
    }

    pub fn log_faint(&mut self, combatant: &str) {
        self.push(format!("{combatant} fainted!"));
    }

    pub fn log_win(&mut self, winner: &str) {
        self.rule();
        self.push(format!("{winner} wins the battle!"));
    }

    pub fn log_turn_limit(&mut self, turns: u32) {
        self.rule();
        self.push(format!("The battle was called off after {turns} turns."));
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "format": self.format,
            "log": self.log,
        })
    }
}
