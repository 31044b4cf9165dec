//! `orion-actions node` / `orion-actions nodes`

use anyhow::{bail, Result};
use clap::ValueEnum;
use tracing::debug;

use super::output::print_output;
use super::Globals;
use crate::domain::node::NodeMatch;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MatchType {
    Sysname,
    Caption,
}

pub fn get(globals: &Globals, identifier: &str) -> Result<()> {
    let (_, conn) = globals.connect()?;
    let node = conn.get_node(identifier)?;
    debug!(identifier, npm = node.is_npm(), ncm = node.is_ncm(), "node resolved");
    print_output(&globals.format, &node)
}

pub fn list(globals: &Globals, match_type: Option<MatchType>, match_string: Option<String>) -> Result<()> {
    let matcher = node_match(match_type, match_string)?;
    let (_, conn) = globals.connect()?;
    let data = conn.list_nodes(matcher.as_ref())?;
    print_output(&globals.format, &data)
}

fn node_match(match_type: Option<MatchType>, match_string: Option<String>) -> Result<Option<NodeMatch>> {
    match (match_type, match_string) {
        (None, None) => Ok(None),
        (Some(MatchType::Sysname), Some(value)) => Ok(Some(NodeMatch::SysName(value))),
        (Some(MatchType::Caption), Some(value)) => Ok(Some(NodeMatch::Caption(value))),
        (Some(_), None) => bail!("--match-type needs --match-string"),
        (None, Some(_)) => bail!("--match-string needs --match-type"),
    }
}
