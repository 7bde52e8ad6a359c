//! rigup: provision a developer machine from a bootstrap repository.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use output::OutputFormat;

/// Provision a developer machine from a bootstrap repository.
#[derive(Parser)]
#[command(name = "rigup")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Output format for progress events and results
  #[arg(long, global = true, value_enum, default_value = "text")]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Clone a repository and run its bootstrap.sh
  Provision {
    /// HTTP(S) URL of the repository to clone
    url: String,
  },

  /// Report whether required tooling is present
  Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Provision { url } => cmd::cmd_provision(&url, cli.output).await,
    Commands::Doctor => cmd::cmd_doctor(cli.output).await,
  }
}
