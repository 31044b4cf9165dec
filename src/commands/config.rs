//! `orion-actions config init|show|path`

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::output::print_output;
use super::Globals;
use crate::config::Config;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a starter config file if none exists
    Init,
    /// Print the effective config with passwords masked
    Show,
    /// Print the config file location
    Path,
}

pub fn run(globals: &Globals, command: ConfigCommands) -> Result<()> {
    let path = match &globals.config {
        Some(path) => path.clone(),
        None => Config::path()?,
    };

    match command {
        ConfigCommands::Init => {
            if crate::config::init(&path)? {
                println!("{} wrote {}", "ok".green().bold(), path.display());
            } else {
                println!("{} {} already exists", "::".blue().bold(), path.display());
            }
            Ok(())
        }
        ConfigCommands::Show => {
            let cfg = globals.load_config()?;
            print_output(&globals.format, &cfg.redacted())
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
