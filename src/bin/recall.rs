//! `recall` command-line binary.
//!
//! Starts an interactive chat session by default.
//!
//! # Environment Variables
//!
//! - `RECALL_DB` — database file (overrides the config file)
//! - `RECALL_MAX_MEMORY` — retention ceiling for stored interactions
//! - `RECALL_STORAGE_DIR` — directory for the default database
//! - `RUST_LOG` — log filter (default: "warn")
//!
//! # Usage
//!
//! ```bash
//! recall                      # chat
//! recall --seed 7 chat        # reproducible follow-up and pruning draws
//! recall --json stats
//! recall prune
//! ```

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use recall_agent::agent::{RandomSource, RngSource};
use recall_agent::cli::{render_stats, Session};
use recall_agent::utilities::printer::Printer;
use recall_agent::{AgentConfig, SQLiteStore, SelfLearningAgent};

#[derive(Debug, Parser)]
#[command(name = "recall", version, about = "A self-learning keyword-retrieval assistant")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, env = "RECALL_CONFIG")]
    config: Option<PathBuf>,

    /// Database file (overrides config and RECALL_DB).
    #[arg(long)]
    db: Option<PathBuf>,

    /// Seed for the random source.
    #[arg(long)]
    seed: Option<u64>,

    /// Print statistics as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat session (default).
    Chat,
    /// Print learning statistics.
    Stats,
    /// Trim interaction history to the retention ceiling.
    Prune,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = AgentConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(db) = cli.db {
        config.database_file = db;
    }
    log::info!("Using database {}", config.database_file.display());

    let store = SQLiteStore::open(&config.database_file)
        .with_context(|| format!("opening {}", config.database_file.display()))?;
    let rng: Box<dyn RandomSource> = match cli.seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::from_entropy()),
    };
    let mut agent = SelfLearningAgent::new(config, Box::new(store), rng)?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let stdout = io::stdout();
            let printer = Printer::new(stdout.is_terminal());
            let mut session = Session::new(io::stdin().lock(), stdout.lock(), printer);
            session.run(&mut agent).context("interactive session")?;
        }
        Command::Stats => {
            let stats = agent.stats()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", render_stats(&stats));
            }
        }
        Command::Prune => {
            let removed = agent.prune()?;
            println!("Removed {removed} interaction(s)");
        }
    }

    Ok(())
}
