use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use creature_battle::battle::{Battle, BattleOptions, BattlePhase};
use creature_battle::load_roster;
use creature_battle::model::CombatantTemplate;
use creature_battle::rng::SeededRandom;
use creature_battle::tournament::{run_tournament, win_rate_matrix, write_csv};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "creature-battle", about = "Turn-based creature battle simulator")]
struct Cli {
    /// JSON roster file. Defaults to the built-in catalog.
    #[arg(long, global = true)]
    roster: Option<PathBuf>,
    /// Seed for every random draw. Omit for an entropy seed.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Turns allowed before a battle is called off (0 disables the cap).
    #[arg(long, global = true, default_value_t = creature_battle::battle::DEFAULT_MAX_TURNS)]
    max_turns: u32,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the combatants in the roster.
    List,
    /// Battle two named combatants.
    Battle {
        side_one: String,
        side_two: String,
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Battle two distinct combatants picked at random.
    Quick {
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Run shuffled pairings for several rounds and print standings.
    Tournament {
        #[arg(long, default_value_t = 5)]
        rounds: u32,
        /// Print the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Simulate every ordered pair and write side-one win rates as CSV.
    Matrix {
        #[arg(long, default_value_t = 100)]
        sims_per_cell: usize,
        #[arg(long, default_value = "matrix.csv")]
        output: PathBuf,
    },
}

#[derive(Debug, Args)]
struct DisplayArgs {
    /// Pause between turns, in milliseconds.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
    /// Print the battle summary as JSON after the log.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let roster = load_roster(cli.roster.as_deref())?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    let options = BattleOptions {
        max_turns: (cli.max_turns > 0).then_some(cli.max_turns),
        ..BattleOptions::default()
    };
    tracing::info!(seed, combatants = roster.len(), "roster loaded");

    match cli.command {
        Command::List => {
            println!("Available combatants:");
            println!("{}", "-".repeat(30));
            for block in roster.describe() {
                println!("{block}\n");
            }
        }
        Command::Battle {
            side_one,
            side_two,
            display,
        } => {
            let one = roster.get(&side_one)?;
            let two = roster.get(&side_two)?;
            play(one, two, seed, options, &display)?;
        }
        Command::Quick { display } => {
            let mut picker = SeededRandom::new(seed);
            let (one, two) = roster.pick_pair(&mut picker)?;
            play(one, two, seed.wrapping_add(1), options, &display)?;
        }
        Command::Tournament { rounds, json } => {
            let report = run_tournament(&roster, rounds, seed, &options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for pairing in &report.pairings {
                    println!(
                        "Round {}: {} vs {} -> {} ({} turns)",
                        pairing.round,
                        pairing.side_one,
                        pairing.side_two,
                        pairing.winner.as_deref().unwrap_or("draw"),
                        pairing.turns
                    );
                }
                println!("\nTOURNAMENT RESULTS");
                println!("{}", "=".repeat(50));
                for (idx, standing) in report.standings.iter().enumerate() {
                    println!(
                        "{}. {}: {}W-{}L-{}D ({:.1}% win rate)",
                        idx + 1,
                        standing.name,
                        standing.wins,
                        standing.losses,
                        standing.draws,
                        standing.win_rate() * 100.0
                    );
                }
            }
        }
        Command::Matrix {
            sims_per_cell,
            output,
        } => {
            if sims_per_cell == 0 {
                anyhow::bail!("--sims-per-cell must be > 0");
            }
            let matrix = win_rate_matrix(&roster, sims_per_cell, seed, &options)?;
            write_csv(&matrix, &roster.names(), &output)
                .with_context(|| format!("Failed to write matrix to {}", output.display()))?;
            println!(
                "Wrote {}x{} matrix to {}",
                matrix.len(),
                matrix.len(),
                output.display()
            );
        }
    }
    Ok(())
}

fn play(
    one: &CombatantTemplate,
    two: &CombatantTemplate,
    seed: u64,
    options: BattleOptions,
    display: &DisplayArgs,
) -> anyhow::Result<()> {
    println!("{} VS {}\n", one.name, two.name);
    let mut battle = Battle::with_rng(
        one.instantiate(),
        two.instantiate(),
        options,
        SeededRandom::new(seed),
    );
    let mut printed = 0;
    loop {
        let stepped = battle.step();
        for line in &battle.log()[printed..] {
            println!("{line}");
        }
        printed = battle.log().len();
        let phase = stepped?;
        if phase == BattlePhase::Finished {
            break;
        }
        if display.delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(display.delay_ms));
        }
    }
    if display.json {
        println!("{}", serde_json::to_string_pretty(&battle.summary())?);
    }
    Ok(())
}
