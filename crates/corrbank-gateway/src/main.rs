//! corrbank CLI: run ledger operations against a freshly bootstrapped
//! in-memory network.
//!
//! Usage:
//! ```bash
//! corrbank seed
//! corrbank invoke --caller bank_a_issuer assignOwnership alice 11111-00004 10000 KZT
//! corrbank query --caller bob getBalance 22222-00004
//! corrbank --config network.json script steps.json
//! ```
//!
//! Each run starts from the seed accounts; use `script` to chain calls.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use corrbank_gateway::{bootstrap, run_script, script::parse_script};
use corrbank_types::{LedgerConfig, Principal};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Correspondent-banking remittance ledger
#[derive(Parser)]
#[command(name = "corrbank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// JSON config overriding the demo network
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bootstrap and print every account as JSON
    Seed,

    /// Run one writing operation
    Invoke {
        /// Principal making the call
        #[arg(long)]
        caller: String,
        /// Operation name (e.g., assignOwnership)
        function: String,
        /// Positional arguments
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run one read-only operation
    Query {
        /// Principal making the call
        #[arg(long)]
        caller: String,
        /// Operation name (e.g., getBalance)
        function: String,
        /// Positional arguments
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Replay a JSON array of calls against one ledger
    Script {
        /// Script file path
        file: PathBuf,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = match &cli.config {
        Some(path) => LedgerConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LedgerConfig::default(),
    };
    let mut router = bootstrap(&config).context("bootstrapping ledger")?;

    match cli.command {
        Commands::Seed => {
            let accounts = router.engine().ledger().accounts()?;
            println!("{}", serde_json::to_string_pretty(&accounts)?);
        }
        Commands::Invoke {
            caller,
            function,
            args,
        } => {
            let out = router.invoke(&Principal::new(caller), &function, &args)?;
            println!("{out}");
        }
        Commands::Query {
            caller,
            function,
            args,
        } => {
            let out = router.query(&Principal::new(caller), &function, &args)?;
            println!("{out}");
        }
        Commands::Script { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("reading script {}", file.display()))?;
            let steps = parse_script(&raw)?;
            let outcomes = run_script(&mut router, &steps);
            for outcome in &outcomes {
                println!("{}", serde_json::to_string(outcome)?);
            }
            let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
            tracing::info!(steps = outcomes.len(), failed, "script finished");
        }
    }
    Ok(())
}
