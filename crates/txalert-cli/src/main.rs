//! CLI relay for banking notification transaction detection.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, classify, config, sources, watch};

/// txalert - Detect transactions in banking app notifications
#[derive(Parser)]
#[command(name = "txalert")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single notification
    Classify(classify::ClassifyArgs),

    /// Relay a stream of JSON-lines notifications
    Watch(watch::WatchArgs),

    /// Classify notification files matching a glob pattern
    Batch(batch::BatchArgs),

    /// Manage monitored source apps
    Sources(sources::SourcesArgs),

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

    // Logs go to stderr; stdout carries records.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Classify(args) => classify::run(args, config_path).await,
        Commands::Watch(args) => watch::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Sources(args) => sources::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
