//! SNMP community and stored-credential resolution.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::Query;
use crate::error::{OrionError, OrionResult};

pub const SNMP_V2_CREDENTIAL_TYPE: &str = "SolarWinds.Orion.Core.Models.Credentials.SnmpCredentialsV2";

/// Pick the community to use: an explicit literal, else a standard name
/// resolved through `standard`.
pub fn get_snmp_community(
    standard: &BTreeMap<String, String>,
    community: Option<&str>,
    std_community: Option<&str>,
) -> OrionResult<String> {
    match (community, std_community) {
        (Some(community), _) => Ok(community.to_string()),
        (None, Some(name)) => standard
            .get(name)
            .cloned()
            .ok_or_else(|| OrionError::InvalidStandardCommunity(name.to_string())),
        (None, None) => Err(OrionError::MissingCommunity),
    }
}

#[derive(Deserialize)]
struct CredentialRow {
    #[serde(rename = "ID")]
    id: i64,
}

/// Look up the stored SNMPv2 credential id for a standard name or literal community.
pub fn get_snmp_cred_id<Q: Query + ?Sized>(
    client: &Q,
    standard: &BTreeMap<String, String>,
    community: &str,
) -> OrionResult<i64> {
    let name = get_snmp_community(standard, None, Some(community))
        .unwrap_or_else(|_| community.to_string());
    debug!(community, "looking up SNMP credential");

    let data = client.query(
        "SELECT ID FROM Orion.Credential WHERE CredentialType=@CredentialType and Name=@name",
        json!({ "CredentialType": SNMP_V2_CREDENTIAL_TYPE, "name": name }),
    )?;
    let rows: Vec<CredentialRow> = data.decode()?;

    match rows.as_slice() {
        [row] => Ok(row.id),
        _ => Err(OrionError::Lookup(format!(
            "failed to look up community in Orion.Credential ({} matches)",
            rows.len()
        ))),
    }
}
