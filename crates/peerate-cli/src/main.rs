use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "peerate")]
#[command(about = "Peerate CLI - timed peer-rating rounds", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a session in the local store and print its links
    Create(commands::create::CreateArgs),

    /// Show a stored session as a participant or the admin sees it
    Show(commands::show::ShowArgs),

    /// Run a complete round in memory with random ratings
    Simulate(commands::simulate::SimulateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::utils::load_config(cli.config.as_ref())?;
    commands::utils::init_logging(&config, cli.log_json);

    match cli.command {
        Commands::Create(args) => commands::create::run(args, config).await?,
        Commands::Show(args) => commands::show::run(args, config).await?,
        Commands::Simulate(args) => commands::simulate::run(args, config).await?,
    }

    Ok(())
}
