//! Waiting on NCM config transfers (`NCM.TransferResults`).

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::client::Query;
use crate::config::TransferConfig;
use crate::error::{OrionError, OrionResult};

use super::types::{TransferResults, TransferStatus};

const TRANSFER_QUERY: &str = "SELECT TransferID, NodeID, Action, RequestedConfigType, \
     RequestedScript, RequestedReboot, ConfigID, TransferProtocol, Status, ErrorMessage, \
     DeviceOutput, DateTime, UserName FROM NCM.TransferResults WHERE TransferID=@transfer_id";

const STATUS_IN_PROGRESS: i64 = 1;
const STATUS_COMPLETE: i64 = 2;
const STATUS_ERROR: i64 = 3;

#[derive(Debug, Deserialize)]
struct TransferRow {
    #[serde(rename = "Status")]
    status: i64,
    #[serde(rename = "RequestedScript")]
    requested_script: Option<String>,
    #[serde(rename = "RequestedReboot")]
    requested_reboot: Option<bool>,
    #[serde(rename = "ErrorMessage")]
    error_message: Option<String>,
    #[serde(rename = "DeviceOutput")]
    device_output: Option<String>,
    #[serde(rename = "UserName")]
    user_name: Option<String>,
}

impl TransferRow {
    fn into_results(self, status: TransferStatus) -> TransferResults {
        TransferResults {
            status,
            requested_script: self.requested_script,
            requested_reboot: self.requested_reboot,
            error_message: self.error_message,
            device_output: self.device_output,
            user_name: self.user_name,
        }
    }
}

/// Polls a transfer until it leaves the in-progress state.
#[derive(Debug, Clone)]
pub struct TransferPoller {
    pub interval: Duration,
    /// Upper bound on status queries; `None` polls forever.
    pub max_attempts: Option<u32>,
}

impl From<&TransferConfig> for TransferPoller {
    fn from(config: &TransferConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.poll_interval_secs),
            max_attempts: (config.max_attempts > 0).then_some(config.max_attempts),
        }
    }
}

impl TransferPoller {
    /// Block the calling thread until the transfer settles.
    pub fn wait<Q: Query + ?Sized>(&self, client: &Q, transfer_id: &str) -> OrionResult<TransferResults> {
        self.wait_with(client, transfer_id, std::thread::sleep)
    }

    /// Like [`wait`](Self::wait), with the sleep supplied by the caller.
    pub fn wait_with<Q, S>(&self, client: &Q, transfer_id: &str, mut sleep: S) -> OrionResult<TransferResults>
    where
        Q: Query + ?Sized,
        S: FnMut(Duration),
    {
        let mut attempts = Attempts::new(self.max_attempts);
        loop {
            let attempt = attempts.record();
            let row = fetch(client, transfer_id)?;
            debug!(transfer_id, status = row.status, attempt, "transfer status");

            let status = match row.status {
                STATUS_IN_PROGRESS => {
                    if attempts.exhausted() {
                        return Err(OrionError::TransferTimeout {
                            transfer_id: transfer_id.to_string(),
                            attempts: attempt,
                        });
                    }
                    sleep(self.interval);
                    continue;
                }
                STATUS_COMPLETE => TransferStatus::Complete,
                STATUS_ERROR => TransferStatus::Error,
                _ => TransferStatus::Unknown,
            };

            info!(transfer_id, ?status, attempts = attempt, "transfer finished");
            return Ok(row.into_results(status));
        }
    }
}

/// Status queries issued so far. Unbounded waits saturate instead of wrapping.
#[derive(Debug)]
struct Attempts {
    count: u32,
    max: Option<u32>,
}

impl Attempts {
    fn new(max: Option<u32>) -> Self {
        Self { count: 0, max }
    }

    fn record(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    fn exhausted(&self) -> bool {
        self.max.is_some_and(|max| self.count >= max)
    }
}

fn fetch<Q: Query + ?Sized>(client: &Q, transfer_id: &str) -> OrionResult<TransferRow> {
    let data = client.query(TRANSFER_QUERY, json!({ "transfer_id": transfer_id }))?;
    data.decode::<TransferRow>()?
        .into_iter()
        .next()
        .ok_or_else(|| OrionError::Lookup(format!("no NCM transfer with id {}", transfer_id)))
}
