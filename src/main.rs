// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pokemon_battle::config::DEFAULT_SERVER_URL;
use pokemon_battle::{logging, Comparator, ComparisonState, HttpBackend};
use std::path::PathBuf;
use tokio::runtime::Runtime;

/// pokemon-battle - compare two Pokémon head-to-head
#[derive(Parser)]
#[command(name = "pokemon-battle")]
#[command(version)]
struct Cli {
    /// Base URL of a running battle-server
    #[arg(long, global = true, env = "POKEMON_BATTLE_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Write logs to this file (interactive mode only logs to a file)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive comparison screen (default)
    Tui,
    /// Compare two Pokémon once and print the result
    Compare {
        left: String,
        right: String,
        /// Print the tally as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every known Pokémon name
    Pokedex,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let backend = HttpBackend::new(reqwest::Client::new(), cli.server.clone());

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            if let Some(path) = &cli.log_file {
                logging::init_file(path, "info")?;
            }
            run_ui_mode(backend, &runtime)?;
        }
        Command::Compare { left, right, json } => {
            init_cli_logging(cli.log_file.as_deref())?;
            runtime.block_on(run_compare(&backend, &left, &right, json))?;
        }
        Command::Pokedex => {
            init_cli_logging(cli.log_file.as_deref())?;
            let entries = runtime.block_on(backend.pokedex())?;
            for entry in &entries {
                println!("{}", entry.name);
            }
            eprintln!("✓ {} Pokémon", entries.len());
        }
    }

    Ok(())
}

fn init_cli_logging(log_file: Option<&std::path::Path>) -> Result<()> {
    match log_file {
        Some(path) => logging::init_file(path, "info"),
        None => {
            logging::init("warn");
            Ok(())
        }
    }
}

async fn run_compare(backend: &HttpBackend, left: &str, right: &str, json: bool) -> Result<()> {
    let mut comparator = Comparator::new();

    match comparator.run(backend, left, right).await {
        ComparisonState::Done(battle) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&battle.result)?);
                return Ok(());
            }

            println!("⚔️  {} (#{}) vs {} (#{})", battle.left.name, battle.left.id, battle.right.name, battle.right.id);
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            for line in &battle.lines {
                println!("{:>5}  {:<16}  {:<5}", line.left, line.label, line.right);
            }
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("🏆 {}", battle.result.result_text);
            println!(
                "💰 {}: {}   {}: {}",
                battle.left.name,
                battle.left_price.display(),
                battle.right.name,
                battle.right_price.display()
            );
            Ok(())
        }
        ComparisonState::Idle { error: Some(message) } => {
            eprintln!("❌ {}", message);
            std::process::exit(1);
        }
        other => anyhow::bail!("Comparison did not finish: {:?}", other),
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(backend: HttpBackend, runtime: &Runtime) -> Result<()> {
    let mut app = ui::App::new();
    ui::run_ui(&mut app, std::sync::Arc::new(backend), runtime.handle().clone())?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_backend: HttpBackend, _runtime: &Runtime) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: pokemon-battle compare <left> <right>");
    std::process::exit(1);
}
