mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deluxe", about = "High pass sharpening with eight blur techniques")]
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
    /// Sharpen an image
    Apply(commands::apply::ApplyArgs),
    /// Print or save the default sharpen config
    Config(commands::config::ConfigArgs),
    /// Show the operation keys and its properties
    Info(commands::info::InfoArgs),
    /// Show the node graph wired for a technique
    Graph(commands::graph::GraphArgs),
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
        Commands::Apply(args) => commands::apply::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Graph(args) => commands::graph::run(args),
    }
}
