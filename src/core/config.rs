//! Configuration file management.
//!
//! Handles reading and validating `.opskit.toml` configuration files.
//! Lookup order: explicit path, `./.opskit.toml`, then
//! `<config dir>/opskit/config.toml`. With no file at all the defaults apply.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::core::reconcile::Families;
use crate::core::sanity::ApiKeyNames;
use crate::error::{ConfigError, Result};

/// Operator configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Azure settings shared by vault commands
    #[serde(default)]
    pub azure: AzureConfig,
    /// Blue/green reconciliation settings
    #[serde(default)]
    pub kafka: KafkaConfig,
    /// Git fleet settings; fleet commands require this section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet: Option<FleetConfig>,
}

/// Azure settings.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    /// Subscription passed to every `az` call.
    ///
    /// When unset, `az` uses whatever subscription is active in its profile.
    #[serde(default)]
    pub subscription: Option<String>,
}

/// Blue/green reconciliation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    /// Colorless secret holding the active color
    #[serde(default = "default_active_color_secret")]
    pub active_color_secret: String,
    /// Broker api key compared before reconciling
    #[serde(default = "default_broker_api_key")]
    pub broker_api_key: String,
    /// Schema registry api key compared before reconciling
    #[serde(default = "default_schema_registry_api_key")]
    pub schema_registry_api_key: String,
    /// Name prefixes of broker credentials
    #[serde(default = "default_broker_prefixes")]
    pub broker_prefixes: Vec<String>,
    /// Name prefixes of schema registry credentials
    #[serde(default = "default_schema_registry_prefixes")]
    pub schema_registry_prefixes: Vec<String>,
}

/// Git fleet settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Directory containing the working copies
    pub directory: PathBuf,
    /// Repository names never touched
    #[serde(default)]
    pub blacklist: Vec<String>,
    /// Azure DevOps organization (name or url), used by `fleet clone`
    #[serde(default)]
    pub organization: Option<String>,
    /// Azure DevOps project, used by `fleet clone`
    #[serde(default)]
    pub project: Option<String>,
}

fn default_active_color_secret() -> String {
    constants::ACTIVE_COLOR_SECRET.to_string()
}

fn default_broker_api_key() -> String {
    constants::BROKER_API_KEY.to_string()
}

fn default_schema_registry_api_key() -> String {
    constants::SCHEMA_REGISTRY_API_KEY.to_string()
}

fn default_broker_prefixes() -> Vec<String> {
    constants::BROKER_PREFIXES.iter().map(|s| s.to_string()).collect()
}

fn default_schema_registry_prefixes() -> Vec<String> {
    constants::SCHEMA_REGISTRY_PREFIXES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            active_color_secret: default_active_color_secret(),
            broker_api_key: default_broker_api_key(),
            schema_registry_api_key: default_schema_registry_api_key(),
            broker_prefixes: default_broker_prefixes(),
            schema_registry_prefixes: default_schema_registry_prefixes(),
        }
    }
}

impl KafkaConfig {
    /// Secret families used for obsolete detection.
    pub fn families(&self) -> Families {
        Families::new(
            self.broker_prefixes.clone(),
            self.schema_registry_prefixes.clone(),
        )
    }

    /// Credentials compared by the rotation sanity check.
    pub fn api_keys(&self) -> ApiKeyNames {
        ApiKeyNames {
            broker: self.broker_api_key.clone(),
            schema_registry: self.schema_registry_api_key.clone(),
        }
    }
}

impl Config {
    /// Path of the project-local config file.
    pub fn local_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Path of the per-user config file, if the platform has a config dir.
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| {
            d.join(constants::CONFIG_DIR)
                .join(constants::GLOBAL_CONFIG_FILE)
        })
    }

    /// Resolve and load the configuration.
    ///
    /// An explicit path must exist. Otherwise the local then the global file
    /// are tried, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse` for unreadable
    /// or malformed files, and validation errors from [`Config::validate`].
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let local = Self::local_path();
        if local.exists() {
            return Self::load_from(&local);
        }

        if let Some(global) = Self::global_path().filter(|p| p.exists()) {
            return Self::load_from(&global);
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents)?;

        debug!(
            subscription = config.azure.subscription.is_some(),
            fleet = config.fleet.is_some(),
            "config loaded"
        );

        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Checks:
    /// - secret names used by the sanity check are non-empty
    /// - family prefix lists are non-empty and contain no blank entries
    /// - the fleet directory, when configured, is non-empty
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` or `ConfigError::MissingField`.
    pub fn validate(&self) -> Result<()> {
        debug!("validating config");

        let kafka = &self.kafka;
        if kafka.active_color_secret.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "kafka.active_color_secret",
            }
            .into());
        }
        if kafka.broker_api_key.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "kafka.broker_api_key",
            }
            .into());
        }
        if kafka.schema_registry_api_key.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "kafka.schema_registry_api_key",
            }
            .into());
        }

        for (field, prefixes) in [
            ("kafka.broker_prefixes", &kafka.broker_prefixes),
            ("kafka.schema_registry_prefixes", &kafka.schema_registry_prefixes),
        ] {
            if prefixes.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "at least one prefix is required".to_string(),
                }
                .into());
            }
            if prefixes.iter().any(|p| p.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "prefixes cannot be blank".to_string(),
                }
                .into());
            }
        }

        if let Some(subscription) = &self.azure.subscription {
            if subscription.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "azure.subscription",
                    reason: "cannot be blank".to_string(),
                }
                .into());
            }
        }

        if let Some(fleet) = &self.fleet {
            if fleet.directory.as_os_str().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "fleet.directory",
                }
                .into());
            }
        }

        Ok(())
    }

    /// Fleet settings, required by every fleet command.
    pub fn fleet(&self) -> Result<&FleetConfig> {
        self.fleet
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField { field: "fleet" }.into())
    }
}
