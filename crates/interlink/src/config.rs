use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use serde::de::{Deserializer, IgnoredAny};
use thiserror::Error;
use tokio::fs;

use crate::error::LifecycleError;

// ============================================================================
// Config (root)
// ============================================================================

/// Host configuration as far as the bridge is concerned.
///
/// Every field is merged over its default independently: unknown keys and
/// wrongly-typed values are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawConfig")]
pub struct Config {
    pub bridge: BridgeConfig,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_saphyr::from_str(contents)?)
    }
}

// ============================================================================
// BridgeConfig
// ============================================================================

/// The `bridge` section. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawBridgeConfig")]
pub struct BridgeConfig {
    pub enabled: bool,
    /// TCP port to listen on. `0` asks the OS for an ephemeral port.
    pub port: u16,
    pub auto_start: bool,
    pub host: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_port(),
            auto_start: false,
            host: default_host(),
        }
    }
}

impl BridgeConfig {
    /// Reject privileged ports when bridging is enabled.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.enabled && (1..1024).contains(&self.port) {
            return Err(LifecycleError::InvalidPort(self.port));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

// ============================================================================
// Lenient deserialization
// ============================================================================

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default, deserialize_with = "lenient")]
    bridge: Option<BridgeConfig>,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            bridge: raw.bridge.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBridgeConfig {
    #[serde(default, deserialize_with = "lenient")]
    enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    port: Option<u16>,
    #[serde(default, deserialize_with = "lenient")]
    auto_start: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    host: Option<String>,
}

impl From<RawBridgeConfig> for BridgeConfig {
    fn from(raw: RawBridgeConfig) -> Self {
        let defaults = Self::default();
        Self {
            enabled: raw.enabled.unwrap_or(defaults.enabled),
            port: raw.port.unwrap_or(defaults.port),
            auto_start: raw.auto_start.unwrap_or(defaults.auto_start),
            host: raw.host.unwrap_or(defaults.host),
        }
    }
}

/// Deserialize `T`, or `None` if the value has some other shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Valid(T),
        Invalid(IgnoredAny),
    }

    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Valid(value) => Some(value),
        Lenient::Invalid(_) => None,
    })
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),
}

// ============================================================================
// Tests
// ============================================================================
