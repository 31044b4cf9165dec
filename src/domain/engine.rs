use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::client::Query;
use crate::error::{OrionError, OrionResult};

/// The main polling engine is always EngineID 1.
pub const PRIMARY_POLLER: &str = "primary";
const PRIMARY_ENGINE_ID: i64 = 1;

#[derive(Deserialize)]
struct EngineRow {
    #[serde(rename = "EngineID")]
    engine_id: i64,
}

/// Map a poller name (or `primary`) to its EngineID.
pub fn get_engine_id<Q: Query + ?Sized>(client: &Q, poller: &str) -> OrionResult<i64> {
    if poller == PRIMARY_POLLER {
        return Ok(PRIMARY_ENGINE_ID);
    }

    let data = client.query(
        "SELECT EngineID, ServerName, IP, ServerType FROM Orion.Engines WHERE ServerName=@poller",
        json!({ "poller": poller }),
    )?;
    let rows: Vec<EngineRow> = data.decode()?;

    match rows.as_slice() {
        [row] => Ok(row.engine_id),
        _ => {
            warn!(poller, matches = rows.len(), "invalid poller name");
            Err(OrionError::InvalidPoller(poller.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSwis;

    #[test]
    fn primary_needs_no_query() {
        let fake = FakeSwis::new();
        assert_eq!(get_engine_id(&fake, "primary").unwrap(), 1);
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn named_poller_resolves_by_server_name() {
        let fake = FakeSwis::new().respond(json!({
            "results": [{ "EngineID": 4, "ServerName": "ape-01", "IP": "10.9.0.4", "ServerType": "Additional" }]
        }));
        assert_eq!(get_engine_id(&fake, "ape-01").unwrap(), 4);
        assert_eq!(fake.calls()[0].1, json!({ "poller": "ape-01" }));
    }

    #[test]
    fn unknown_or_duplicate_poller_is_invalid() {
        let fake = FakeSwis::new().respond(json!({ "results": [] }));
        assert!(matches!(
            get_engine_id(&fake, "nope"),
            Err(OrionError::InvalidPoller(ref name)) if name == "nope"
        ));

        let fake = FakeSwis::new()
            .respond(json!({ "results": [{ "EngineID": 2 }, { "EngineID": 3 }] }));
        assert!(matches!(get_engine_id(&fake, "dup"), Err(OrionError::InvalidPoller(_))));
    }
}
