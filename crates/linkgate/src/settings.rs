//! Layered settings for the gateway binary.
//!
//! Sources, later ones winning:
//!
//! 1. built-in defaults (every field has one)
//! 2. `config/linkgate.{toml,yaml,json,...}` if present
//! 3. `LINKGATE__SECTION__FIELD` environment variables
//!
//! List fields can be set from the environment as comma-separated values,
//! e.g. `LINKGATE__ACCESS__KEYS=alpha,beta`.

use config::{Config, ConfigError, Environment, File, FileFormat};
use linkgate_content::ContentConfig;
use linkgate_protocol::DEFAULT_SALT;
use linkgate_session::SessionConfig;
use linkgate_vault::VaultConfig;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config/linkgate";
const ENV_PREFIX: &str = "LINKGATE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub session: SessionConfig,
    pub access: AccessConfig,
    pub vault: VaultConfig,
    pub content: ContentConfig,
    pub payload: PayloadConfig,
    pub gateway: ActorSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    /// `host:port`, ready for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Access keys that unlock privileged sessions. Empty means nobody can
/// authenticate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub keys: Vec<String>,
}

/// Salt for the search payload cipher. Browser clients ship the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadConfig {
    pub salt: String,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorSettings {
    /// Capacity of the actor's command queue.
    pub channel_size: usize,
}

impl Default for ActorSettings {
    fn default() -> Self {
        Self { channel_size: 64 }
    }
}

impl Settings {
    /// Loads settings from the optional config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(environment())
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Parses settings from a TOML document. Missing fields take defaults.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("access.keys")
        .with_list_parse_key("vault.trusted_domains")
}
