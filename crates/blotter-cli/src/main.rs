//! CLI application for ingesting daily incident summary reports.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, fetch, process, status};

/// Daily incident summary ingestion - turn published reports into incident records
#[derive(Parser)]
#[command(name = "blotter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single report (file or URL)
    Process(process::ProcessArgs),

    /// Parse multiple report files
    Batch(batch::BatchArgs),

    /// Download the published report
    Fetch(fetch::FetchArgs),

    /// Show incident counts per nature from the database
    Status(status::StatusArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Process(args) => process::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Fetch(args) => fetch::run(args, cli.config.as_deref()).await,
        Commands::Status(args) => status::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args).await,
    }
}
