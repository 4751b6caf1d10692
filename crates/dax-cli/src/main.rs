//! # dax CLI entry point
//!
//! Parses command-line arguments, initialises logging, and dispatches to
//! the subcommand handlers in `dax_cli`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dax_cli::arbitration::{run_arbitration, ArbitrationArgs};
use dax_cli::config::DaxConfig;
use dax_cli::disclosure::{run_disclosure, DisclosureArgs};
use dax_cli::ledger::{run_ledger, LedgerArgs};
use dax_cli::state::DEFAULT_STATE_FILE;
use dax_cli::Session;

/// Disclosure negotiation and arbitration toolkit.
///
/// Every command reads and writes a single JSON state file holding the
/// ledgers, negotiations, and the arbitration engine.
#[derive(Parser, Debug)]
#[command(name = "dax", version, about, long_about = None)]
struct Cli {
    /// Log more to stderr: -v info, -vv debug, -vvv trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the JSON state file.
    #[arg(long, global = true, default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Value ledger operations (mint, approve, balance).
    Ledger(LedgerArgs),

    /// Negotiation lifecycle (open, accept, update terms, claim).
    Disclosure(DisclosureArgs),

    /// Arbitration engine (eligibility, queueing, review, verdicts, admin).
    Arbitration(ArbitrationArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = DaxConfig::load(cli.config.as_deref()).and_then(|config| {
        let session = Session::new(config, cli.state.clone());
        tracing::debug!(state = %session.state_path.display(), "session ready");
        match &cli.command {
            Commands::Ledger(args) => run_ledger(args, &session),
            Commands::Disclosure(args) => run_disclosure(args, &session),
            Commands::Arbitration(args) => run_arbitration(args, &session),
        }
    });

    result.map(ExitCode::from).unwrap_or_else(|err| {
        tracing::error!("{err:#}");
        eprintln!("error: {err:#}");
        ExitCode::FAILURE
    })
}

/// `RUST_LOG` wins when set; otherwise the `-v` count picks the level.
fn init_logging(verbosity: u8) {
    let level = ["warn", "info", "debug"]
        .get(usize::from(verbosity))
        .copied()
        .unwrap_or("trace");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
