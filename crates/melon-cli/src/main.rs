mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "melon", about = "Hydroponic melon plant analysis assistant")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract colour health features from a plant image
    Features(commands::features::FeaturesArgs),
    /// Extract features and ask the AI provider for an assessment
    Analyze(commands::analyze::AnalyzeArgs),
    /// Ask the cultivation assistant a question
    Chat(commands::chat::ChatArgs),
    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Features(args) => commands::features::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Chat(args) => commands::chat::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
