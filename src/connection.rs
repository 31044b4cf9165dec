//! An explicit handle on one configured Orion platform.

use tracing::debug;

use crate::client::{Query, QueryResult, SwisClient};
use crate::config::{Config, Defaults};
use crate::domain::node::{self, NodeMatch, OrionNode};
use crate::domain::transfer::TransferPoller;
use crate::domain::types::TransferResults;
use crate::domain::{engine, snmp};
use crate::error::OrionResult;

pub struct Connection<C = SwisClient> {
    platform: String,
    client: C,
    defaults: Defaults,
}

impl Connection<SwisClient> {
    /// Connect to `platform`, or the configured default.
    pub fn open(config: &Config, platform: Option<&str>) -> OrionResult<Self> {
        let (name, entry) = config.platform(platform)?;
        debug!(platform = name, host = %entry.host, "connecting to Orion platform");

        let client = SwisClient::new(entry)?;
        debug!(url = client.base_url(), "SWIS endpoint");
        Ok(Self::with_client(name, client, config.defaults.clone()))
    }
}

impl<C: Query> Connection<C> {
    pub fn with_client(platform: &str, client: C, defaults: Defaults) -> Self {
        Self {
            platform: platform.to_string(),
            client,
            defaults,
        }
    }

    /// Name of the platform this connection resolved to.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn get_node(&self, identifier: &str) -> OrionResult<OrionNode> {
        node::get_node(&self.client, identifier)
    }

    pub fn list_nodes(&self, matcher: Option<&NodeMatch>) -> OrionResult<QueryResult> {
        node::list_nodes(&self.client, matcher)
    }

    pub fn get_snmp_cred_id(&self, community: &str) -> OrionResult<i64> {
        snmp::get_snmp_cred_id(&self.client, &self.defaults.snmp, community)
    }

    pub fn get_engine_id(&self, poller: &str) -> OrionResult<i64> {
        engine::get_engine_id(&self.client, poller)
    }

    pub fn get_ncm_transfer_results(
        &self,
        transfer_id: &str,
        poller: &TransferPoller,
    ) -> OrionResult<TransferResults> {
        poller.wait(&self.client, transfer_id)
    }
}
