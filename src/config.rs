use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Toml, Yaml};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{OrionError, OrionResult};

const ENV_PREFIX: &str = "ORION_ACTIONS_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Platforms keyed by name.
    #[serde(default)]
    pub orion: BTreeMap<String, PlatformConfig>,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub transfer: TransferConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(deserialize_with = "lenient_string")]
    pub host: String,
    #[serde(deserialize_with = "lenient_string")]
    pub user: String,
    #[serde(deserialize_with = "lenient_string")]
    pub password: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub verify_tls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    17778
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub platform: Option<String>,
    /// Standard community names mapped to literal SNMP community strings.
    #[serde(default, deserialize_with = "lenient_string_map")]
    pub snmp: BTreeMap<String, String>,
}

/// Environment overrides arrive typed, so `PASSWORD=123456` is a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::UInt(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(String::from)
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}

fn lenient_string_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error> {
    let map = BTreeMap::<String, Scalar>::deserialize(deserializer)?;
    Ok(map.into_iter().map(|(k, v)| (k, v.into())).collect())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// 0 polls until the transfer settles.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    360
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("orion-actions").join("config.toml"))
    }

    /// Resolve `platform`, or the configured default, to its entry.
    pub fn platform(&self, platform: Option<&str>) -> OrionResult<(&str, &PlatformConfig)> {
        let name = match platform {
            Some(name) => name,
            None => self
                .defaults
                .platform
                .as_deref()
                .ok_or_else(|| OrionError::Config("no default Orion platform".to_string()))?,
        };

        self.orion
            .get_key_value(name)
            .map(|(name, entry)| (name.as_str(), entry))
            .ok_or_else(|| {
                OrionError::Config(format!(
                    "Orion platform '{}' not in the config. Available platforms: {}",
                    name,
                    self.orion.keys().cloned().collect::<Vec<_>>().join(", ")
                ))
            })
    }

    pub fn validate(&self) -> OrionResult<()> {
        if self.orion.is_empty() {
            return Err(OrionError::Config(
                "Orion host details not in the config".to_string(),
            ));
        }
        Ok(())
    }

    /// A copy safe to print: passwords are masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for platform in copy.orion.values_mut() {
            platform.password = "********".to_string();
        }
        copy
    }

    /// Starter config written by `config init`.
    pub fn template() -> Self {
        let mut orion = BTreeMap::new();
        orion.insert(
            "orion".to_string(),
            PlatformConfig {
                host: "orion.example.net".to_string(),
                user: "admin".to_string(),
                password: "changeme".to_string(),
                port: default_port(),
                verify_tls: false,
                timeout_secs: default_timeout_secs(),
            },
        );
        let mut snmp = BTreeMap::new();
        snmp.insert("ro".to_string(), "public".to_string());
        snmp.insert("rw".to_string(), "private".to_string());
        Self {
            orion,
            defaults: Defaults {
                platform: Some("orion".to_string()),
                snmp,
            },
            transfer: TransferConfig::default(),
        }
    }
}

/// Load from `path` (or the default location), with `ORION_ACTIONS_*` overrides.
///
/// `.yaml`/`.yml` files are read as YAML, anything else as TOML.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::path()?,
    };

    let figment = if is_yaml(&path) {
        Figment::new().merge(Yaml::file(&path))
    } else {
        Figment::new().merge(Toml::file(&path))
    };
    let config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .with_context(|| format!("loading {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(config)
}

/// Write the template config to `path` unless a file already exists.
pub fn init(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(&Config::template()).context("serializing config")?;
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(true)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
