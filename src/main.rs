mod client;
mod commands;
mod config;
mod connection;
mod domain;
mod error;
#[cfg(test)]
mod testing;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::Globals;

#[derive(Parser)]
#[command(name = "orion-actions", version, about = "Query and manage a SolarWinds Orion platform over SWIS")]
struct Cli {
    /// Path to config file (default: ~/.config/orion-actions/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Orion platform name (defaults to defaults.platform)
    #[arg(long, global = true)]
    platform: Option<String>,

    /// Output format (table or json)
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// Log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a node by IP address or caption
    Node {
        /// IP address or caption
        identifier: String,
    },

    /// List node IDs, sysnames and captions
    Nodes {
        /// Column to match on
        #[arg(long, value_enum)]
        match_type: Option<commands::node::MatchType>,

        /// Value the column must equal
        #[arg(long)]
        match_string: Option<String>,
    },

    #[command(flatten)]
    Swis(commands::swis::SwisCommands),

    /// SNMP community helpers
    Snmp {
        #[command(subcommand)]
        command: commands::snmp::SnmpCommands,
    },

    /// Map a poller name (or "primary") to its EngineID
    EngineId {
        /// Poller server name
        poller: String,
    },

    /// Wait for an NCM transfer to finish and show its results
    NcmTransfer {
        /// TransferID from NCM.TransferResults
        transfer_id: String,

        /// Seconds between status polls (overrides config)
        #[arg(long)]
        interval: Option<u64>,

        /// Give up after this many polls, 0 for never (overrides config)
        #[arg(long)]
        max_attempts: Option<u32>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let globals = Globals {
        config: cli.config,
        platform: cli.platform,
        format: cli.format,
    };

    match cli.command {
        Commands::Node { identifier } => commands::node::get(&globals, &identifier),
        Commands::Nodes {
            match_type,
            match_string,
        } => commands::node::list(&globals, match_type, match_string),
        Commands::Swis(command) => commands::swis::run(&globals, command),
        Commands::Snmp { command } => commands::snmp::run(&globals, command),
        Commands::EngineId { poller } => commands::engine::run(&globals, &poller),
        Commands::NcmTransfer {
            transfer_id,
            interval,
            max_attempts,
        } => commands::ncm::transfer(&globals, &transfer_id, interval, max_attempts),
        Commands::Config { command } => commands::config::run(&globals, command),
    }
}
