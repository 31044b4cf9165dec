//! `orion-actions snmp community` / `orion-actions snmp cred-id`

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use super::output::print_output;
use super::Globals;
use crate::domain::snmp;

#[derive(Subcommand)]
pub enum SnmpCommands {
    /// Resolve the SNMP community to use
    Community {
        /// Literal community string (wins over --std-community)
        #[arg(long)]
        community: Option<String>,
        /// Standard community name from defaults.snmp
        #[arg(long)]
        std_community: Option<String>,
    },
    /// Look up the Orion credential ID for a community
    CredId {
        /// Standard community name, or a literal community string
        community: String,
    },
}

pub fn run(globals: &Globals, command: SnmpCommands) -> Result<()> {
    match command {
        SnmpCommands::Community {
            community,
            std_community,
        } => {
            // Pure config lookup; no platform connection needed.
            let cfg = globals.load_config()?;
            let resolved = snmp::get_snmp_community(
                &cfg.defaults.snmp,
                community.as_deref(),
                std_community.as_deref(),
            )?;
            print_output(&globals.format, &json!({ "community": resolved }))
        }
        SnmpCommands::CredId { community } => {
            let (_, conn) = globals.connect()?;
            let id = conn.get_snmp_cred_id(&community)?;
            print_output(&globals.format, &json!({ "credential_id": id }))
        }
    }
}
