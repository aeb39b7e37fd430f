//! Resona CLI - resonant model analysis of sampled sounds.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "resona")]
#[command(author, version, about = "Resonant model analysis of sampled sounds", long_about = None)]
struct Cli {
    /// Log analysis details (onset, slice schedule, clamping) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display WAV file information
    Info(commands::info::InfoArgs),

    /// List the spectral peaks of one window
    Point(commands::point::PointArgs),

    /// Fit a resonant model to an attack and its decay
    Region(commands::region::RegionArgs),

    /// Synthesize a sum of decaying partials
    Generate(commands::generate::GenerateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Point(args) => commands::point::run(args),
        Commands::Region(args) => commands::region::run(args),
        Commands::Generate(args) => commands::generate::run(args),
    }
}
