//! Typed blocking client for the Orion information service (SWIS) JSON API.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::PlatformConfig;
use crate::error::{OrionError, OrionResult};

const API_PATH: &str = "SolarWinds/InformationService/v3/Json/";

/// A single row of a SWQL result set.
pub type Row = Map<String, Value>;

/// The body of a SWQL query response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Absent when the platform answers with something other than a result set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Row>>,
}

impl QueryResult {
    /// Borrow the rows, failing if the response had no `results` member.
    pub fn rows(&self) -> OrionResult<&[Row]> {
        self.results
            .as_deref()
            .ok_or_else(|| OrionError::MissingResults(self.describe()))
    }

    /// Decode every row into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> OrionResult<Vec<T>> {
        self.rows()?
            .iter()
            .map(|row| serde_json::from_value(Value::Object(row.clone())).map_err(Into::into))
            .collect()
    }

    fn describe(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "<unprintable>".to_string())
    }
}

/// The query primitive the resolvers are written against.
pub trait Query {
    /// Run SWQL with named parameters (a JSON object, or `null` for none).
    fn query(&self, swql: &str, params: Value) -> OrionResult<QueryResult>;
}

pub struct SwisClient {
    base_url: String,
    user: String,
    password: String,
    http: Client,
}

impl SwisClient {
    pub fn new(platform: &PlatformConfig) -> OrionResult<Self> {
        Self::with_base_url(base_url(&platform.host, platform.port), platform)
    }

    /// Build against an explicit endpoint root (ending in `/`).
    fn with_base_url(base_url: String, platform: &PlatformConfig) -> OrionResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(platform.timeout_secs))
            .danger_accept_invalid_certs(!platform.verify_tls)
            .build()?;
        Ok(Self {
            base_url,
            user: platform.user.clone(),
            password: platform.password.clone(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run an Invoke of `verb` on `entity` with positional arguments.
    pub fn invoke(&self, entity: &str, verb: &str, args: &[Value]) -> OrionResult<Value> {
        let body = Value::Array(args.to_vec());
        self.send(Method::POST, &format!("Invoke/{}/{}", entity, verb), Some(&body))?
            .json()
            .map_err(Into::into)
    }

    /// Create an instance of `entity`; returns the new object's URI.
    pub fn create(&self, entity: &str, properties: &Value) -> OrionResult<Value> {
        self.send(Method::POST, &format!("Create/{}", entity), Some(properties))?
            .json()
            .map_err(Into::into)
    }

    pub fn read(&self, uri: &str) -> OrionResult<Value> {
        self.send(Method::GET, uri, None)?.json().map_err(Into::into)
    }

    pub fn update(&self, uri: &str, properties: &Value) -> OrionResult<()> {
        self.send(Method::POST, uri, Some(properties))?;
        Ok(())
    }

    pub fn delete(&self, uri: &str) -> OrionResult<()> {
        self.send(Method::DELETE, uri, None)?;
        Ok(())
    }

    pub fn bulk_update(&self, uris: &[String], properties: &Value) -> OrionResult<()> {
        let body = json!({ "uris": uris, "properties": properties });
        self.send(Method::POST, "BulkUpdate", Some(&body))?;
        Ok(())
    }

    pub fn bulk_delete(&self, uris: &[String]) -> OrionResult<()> {
        let body = json!({ "uris": uris });
        self.send(Method::POST, "BulkDelete", Some(&body))?;
        Ok(())
    }

    // ── Internal helpers ───────────────────────────────────

    fn send(&self, method: Method, fragment: &str, body: Option<&Value>) -> OrionResult<Response> {
        let url = format!("{}{}", self.base_url, fragment);
        debug!(method = %method, url = %url, "SWIS request");

        let mut request = self
            .http
            .request(method, &url)
            .basic_auth(&self.user, Some(&self.password));
        if let Some(body) = body {
            request = request.json(body);
        }
        let resp = request.send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(OrionError::Http {
                url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

impl Query for SwisClient {
    fn query(&self, swql: &str, params: Value) -> OrionResult<QueryResult> {
        let body = query_body(swql, params);
        self.send(Method::POST, "Query", Some(&body))?
            .json()
            .map_err(Into::into)
    }
}

fn base_url(host: &str, port: u16) -> String {
    format!("https://{}:{}/{}", host.trim_end_matches('/'), port, API_PATH)
}

fn query_body(swql: &str, params: Value) -> Value {
    let parameters = match params {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    json!({ "query": swql, "parameters": parameters })
}
