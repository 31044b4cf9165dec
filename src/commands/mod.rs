pub mod config;
pub mod engine;
pub mod ncm;
pub mod node;
pub mod output;
pub mod snmp;
pub mod swis;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::connection::Connection;

/// Flags shared by every action.
pub struct Globals {
    pub config: Option<PathBuf>,
    pub platform: Option<String>,
    pub format: String,
}

impl Globals {
    pub fn load_config(&self) -> Result<Config> {
        crate::config::load(self.config.as_deref())
    }

    pub fn connect(&self) -> Result<(Config, Connection)> {
        let cfg = self.load_config()?;
        let conn = Connection::open(&cfg, self.platform.as_deref())
            .context("connecting to Orion")?;
        info!(platform = conn.platform(), "connected");
        Ok((cfg, conn))
    }
}
