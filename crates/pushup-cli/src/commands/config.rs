use std::path::Path;

use clap::Subcommand;
use pushup_core::error::Result;
use pushup_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "countdown.seconds")
        key: String,
    },
    /// List all config values
    List,
    /// Print the config file location
    Path,
}

pub fn run(action: ConfigAction, config: &Config, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => match config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(ConfigError::UnknownKey(key).into()),
        },
        ConfigAction::List => {
            let json = serde_json::to_string_pretty(config)?;
            println!("{json}");
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}
