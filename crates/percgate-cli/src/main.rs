//! Percgate CLI - offline front end for the percussion gate engine.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "percgate")]
#[command(author, version, about = "Sidechain-triggered noise gate for percussion stems", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Gate a WAV file offline
    Gate(commands::gate::GateArgs),

    /// Analyze a WAV file and suggest gate settings
    Suggest(commands::suggest::SuggestArgs),

    /// List the built-in drum profiles
    Profiles(commands::profiles::ProfilesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Gate(args) => commands::gate::run(args),
        Commands::Suggest(args) => commands::suggest::run(args),
        Commands::Profiles(args) => commands::profiles::run(args),
    }
}
