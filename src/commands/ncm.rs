//! `orion-actions ncm-transfer` — wait for an NCM transfer and report its outcome.

use std::time::Duration;

use anyhow::{Context, Result};

use super::output::print_output;
use super::Globals;
use crate::domain::transfer::TransferPoller;

pub fn transfer(
    globals: &Globals,
    transfer_id: &str,
    interval_secs: Option<u64>,
    max_attempts: Option<u32>,
) -> Result<()> {
    let (cfg, conn) = globals.connect()?;

    let mut poller = TransferPoller::from(&cfg.transfer);
    if let Some(secs) = interval_secs {
        poller.interval = Duration::from_secs(secs);
    }
    if let Some(max) = max_attempts {
        poller.max_attempts = (max > 0).then_some(max);
    }

    let results = conn
        .get_ncm_transfer_results(transfer_id, &poller)
        .with_context(|| format!("waiting for NCM transfer {}", transfer_id))?;
    print_output(&globals.format, &results)
}
