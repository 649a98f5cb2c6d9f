use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pushup_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pushup-cli", version, about = "Push-Up Plus CLI")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a countdown and print its events
    Countdown(commands::countdown::CountdownArgs),
    /// Countdown, then "record" until stopped
    Record(commands::record::RecordArgs),
    /// Print a congratulatory message
    Congrats(commands::congrats::CongratsArgs),
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "pushup_core=debug,pushup_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let result = Config::load_from(&config_path)
        .map_err(pushup_core::CoreError::from)
        .and_then(|config| match cli.command {
            Commands::Countdown(args) => commands::countdown::run(args, &config),
            Commands::Record(args) => commands::record::run(args, &config),
            Commands::Congrats(args) => commands::congrats::run(args, &config),
            Commands::Config { action } => commands::config::run(action, &config, &config_path),
        });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
