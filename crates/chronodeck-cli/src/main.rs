use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod render;
mod session;

#[derive(Parser)]
#[command(name = "chronodeck", version, about = "Clock, stopwatch and countdown timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live wall clock
    Clock(commands::clock::ClockArgs),
    /// Interactive stopwatch with laps
    Stopwatch(commands::stopwatch::StopwatchArgs),
    /// Run a countdown to completion
    Timer(commands::timer::TimerArgs),
    /// Interactive session across all modes
    Deck(commands::deck::DeckArgs),
    /// List countdown presets
    Presets(commands::presets::PresetsArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("CHRONODECK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Clock(args) => commands::block_on(commands::clock::run(args)),
        Commands::Stopwatch(args) => commands::block_on(commands::stopwatch::run(args)),
        Commands::Timer(args) => commands::block_on(commands::timer::run(args)),
        Commands::Deck(args) => commands::block_on(commands::deck::run(args)),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
