use anyhow::Result;
use serde_json::json;

use super::output::print_output;
use super::Globals;

pub fn run(globals: &Globals, poller: &str) -> Result<()> {
    let (_, conn) = globals.connect()?;
    let engine_id = conn.get_engine_id(poller)?;
    print_output(&globals.format, &json!({ "poller": poller, "engine_id": engine_id }))
}
