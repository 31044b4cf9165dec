//! Raw SWIS actions: query, invoke, and the CRUD verbs.

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::{json, Map, Value};

use super::output::print_output;
use super::Globals;
use crate::client::Query;

#[derive(Subcommand)]
pub enum SwisCommands {
    /// Run a SWQL query
    Query {
        /// SWQL text, e.g. "SELECT NodeID FROM Orion.Nodes WHERE Caption=@c"
        swql: String,

        /// Named parameter as key=value (repeatable)
        #[arg(long = "param", value_parser = parse_key_value)]
        params: Vec<(String, Value)>,
    },

    /// Invoke a verb on an entity
    Invoke {
        /// Entity type, e.g. Orion.Nodes
        entity: String,
        /// Verb name, e.g. PollNow
        verb: String,
        /// Positional arguments (JSON, or plain strings)
        args: Vec<String>,
    },

    /// Create an entity instance
    Create {
        entity: String,
        /// Property as key=value (repeatable)
        #[arg(long = "prop", value_parser = parse_key_value)]
        properties: Vec<(String, Value)>,
    },

    /// Read an object by URI
    Read { uri: String },

    /// Update an object's properties
    Update {
        uri: String,
        #[arg(long = "prop", value_parser = parse_key_value)]
        properties: Vec<(String, Value)>,
    },

    /// Delete an object by URI
    Delete { uri: String },

    /// Update several objects with the same properties
    BulkUpdate {
        #[arg(required = true)]
        uris: Vec<String>,
        #[arg(long = "prop", value_parser = parse_key_value)]
        properties: Vec<(String, Value)>,
    },

    /// Delete several objects
    BulkDelete {
        #[arg(required = true)]
        uris: Vec<String>,
    },
}

pub fn run(globals: &Globals, command: SwisCommands) -> Result<()> {
    let (_, conn) = globals.connect()?;
    let client = conn.client();

    match command {
        SwisCommands::Query { swql, params } => {
            let data = client.query(&swql, to_object(params))?;
            print_output(&globals.format, &data)
        }
        SwisCommands::Invoke { entity, verb, args } => {
            let args: Vec<Value> = args.iter().map(|a| parse_value(a)).collect();
            let data = client
                .invoke(&entity, &verb, &args)
                .with_context(|| format!("invoking {}.{}", entity, verb))?;
            print_output(&globals.format, &data)
        }
        SwisCommands::Create { entity, properties } => {
            let uri = client
                .create(&entity, &to_object(properties))
                .with_context(|| format!("creating {}", entity))?;
            print_output(&globals.format, &json!({ "uri": uri }))
        }
        SwisCommands::Read { uri } => {
            let data = client.read(&uri).with_context(|| format!("reading {}", uri))?;
            print_output(&globals.format, &data)
        }
        SwisCommands::Update { uri, properties } => {
            client
                .update(&uri, &to_object(properties))
                .with_context(|| format!("updating {}", uri))?;
            print_output(&globals.format, &json!({ "updated": uri }))
        }
        SwisCommands::Delete { uri } => {
            client.delete(&uri).with_context(|| format!("deleting {}", uri))?;
            print_output(&globals.format, &json!({ "deleted": uri }))
        }
        SwisCommands::BulkUpdate { uris, properties } => {
            client
                .bulk_update(&uris, &to_object(properties))
                .context("bulk update")?;
            print_output(&globals.format, &json!({ "updated": uris }))
        }
        SwisCommands::BulkDelete { uris } => {
            client.bulk_delete(&uris).context("bulk delete")?;
            print_output(&globals.format, &json!({ "deleted": uris }))
        }
    }
}

/// Parse `key=value`; the value is JSON when it parses as JSON, else a string.
pub fn parse_key_value(arg: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", arg))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", arg));
    }
    Ok((key.to_string(), parse_value(value)))
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn to_object(pairs: Vec<(String, Value)>) -> Value {
    Value::Object(pairs.into_iter().collect::<Map<String, Value>>())
}
