use clap::Parser;
use miette::{IntoDiagnostic, Result};
use simplewallet::application::engine::LedgerEngine;
use simplewallet::application::handler::WalletHandler;
use simplewallet::domain::ports::LedgerStateBox;
use simplewallet::infrastructure::in_memory::InMemoryLedgerState;
#[cfg(feature = "storage-rocksdb")]
use simplewallet::infrastructure::rocksdb::RocksDBLedgerState;
use simplewallet::interfaces::csv::balance_writer::BalanceWriter;
use simplewallet::interfaces::csv::instruction_reader::InstructionReader;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input instructions CSV file (signer, operation, amount, to)
    input: PathBuf,

    /// Path to persistent ledger state (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Log verbosity: -v info, -vv debug, -vvv trace. RUST_LOG is used when absent.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Builds the subscriber handed to the handler. Logs go to stderr so that
/// stdout carries only the balance report.
fn log_dispatch(verbose: u8) -> Dispatch {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    Dispatch::new(subscriber)
}

fn open_state(db_path: Option<PathBuf>) -> Result<LedgerStateBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => Ok(Box::new(RocksDBLedgerState::open(path).into_diagnostic()?)),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryLedgerState::new()))
        }
        None => Ok(Box::new(InMemoryLedgerState::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let handler = WalletHandler::new(log_dispatch(cli.verbose));
    let engine = LedgerEngine::new(handler, open_state(cli.db_path)?);

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = InstructionReader::new(file);
    for submission in reader.submissions() {
        match submission {
            Ok(submission) => {
                if let Err(e) = engine.process_submission(submission).await {
                    eprintln!("Error processing instruction: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading instruction: {}", e);
            }
        }
    }

    let accounts = engine.into_results().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = BalanceWriter::new(stdout.lock());
    writer.write_accounts(accounts).into_diagnostic()?;

    Ok(())
}
