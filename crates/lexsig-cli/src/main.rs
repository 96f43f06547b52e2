use anyhow::Result;
use clap::{Parser, Subcommand};
use lexsig_cli::commands::keys::{self, KeysArgs};
use lexsig_cli::commands::record::{self, RecordArgs};
use tracing_subscriber::EnvFilter;

/// Key management and record signing.
#[derive(Parser, Debug)]
#[command(name = "lexsig", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate and check key pairs.
    Keys(KeysArgs),
    /// Create, sign and verify records.
    Record(RecordArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Keys(args) => keys::run(args),
        Commands::Record(args) => record::run(args),
    }
}
