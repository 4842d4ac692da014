#![deny(warnings)]

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use santase_app::cli;
use santase_app::config::AppConfig;
use santase_app::logging::init_logging;
use santase_app::service::GameService;
use santase_bot::{BotFactory, LowestLegalBot, OpponentKind};
use santase_core::AppInfo;
use santase_core::game::opponent::Opponent;
use santase_core::game::serialization::GameSnapshot;
use santase_core::game::state::GameState;
use santase_core::game::table::Table;
use santase_core::model::player::Player;

/// Play a hand of Santase (Sixty-Six) against a bot in the terminal.
#[derive(Debug, Parser)]
#[command(name = "santase", author, version, about = "Two-player Santase in the terminal")]
struct Cli {
    /// Path to a YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the deal seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the opponent kind (lowest_legal or random).
    #[arg(long, value_name = "KIND")]
    opponent: Option<String>,

    /// Override the opponent's own seed.
    #[arg(long, value_name = "SEED")]
    opponent_seed: Option<u64>,

    /// Override how long a finished trick stays on the table.
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Let the opponent lead the first trick.
    #[arg(long)]
    opponent_leads: bool,

    /// Play the human side with the lowest-legal bot instead of reading stdin.
    #[arg(long)]
    auto: bool,

    /// Write the final state as a JSON snapshot.
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.game.seed = Some(seed);
    }
    if let Some(kind) = cli.opponent {
        config.opponent.kind = kind;
    }
    if let Some(seed) = cli.opponent_seed {
        config.opponent.seed = Some(seed);
    }
    if let Some(delay) = cli.delay_ms {
        config.game.reveal_delay_ms = delay;
    }
    if cli.opponent_leads {
        config.game.human_leads_first = false;
    }
    config.validate()?;

    let _logging_guard = init_logging(&config.logging)?;

    let seed = config.game.seed.unwrap_or_else(rand::random);
    let leader = if config.game.human_leads_first {
        Player::Human
    } else {
        Player::Opponent
    };
    let kind: OpponentKind = config.opponent.opponent_kind();
    let factory = BotFactory::new(kind, config.opponent.seed.unwrap_or(seed));
    tracing::info!(target: "santase_app::service", seed, %kind, %leader, "dealing");

    println!(
        "{} {} ({}): seed {seed}, opponent {kind}",
        AppInfo::name(),
        AppInfo::version(),
        AppInfo::codename()
    );

    let state = GameState::with_seed(seed, leader);
    let autopilot: Option<Box<dyn Opponent>> = match state.trump_card() {
        Some(trump) if cli.auto => Some(Box::new(LowestLegalBot::new(
            state.hand(Player::Human),
            trump,
        ))),
        _ => None,
    };
    let table = Table::deal(state, &factory).context("dealing the hand")?;
    let (mut service, events) = GameService::spawn(table, config.game.reveal_delay());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let outcome = cli::run_session(&service, &events, stdin.lock(), &mut stdout, autopilot);
    let final_state = service.snapshot();
    service.shutdown();
    outcome?;

    if !final_state.is_over() {
        println!("Hand abandoned.");
    }
    if let Some(path) = cli.snapshot {
        let json = GameSnapshot::to_json(&final_state).context("serializing snapshot")?;
        fs::write(&path, json)
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
    }
    Ok(())
}
