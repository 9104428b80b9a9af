//! Constants used throughout opskit.
//!
//! Centralizes magic strings and configuration values.

/// Project-local configuration file name.
pub const CONFIG_FILE: &str = ".opskit.toml";

/// Directory under the user config dir holding the global config.
pub const CONFIG_DIR: &str = "opskit";

/// Global configuration file name inside [`CONFIG_DIR`].
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "OPSKIT_LOG";

/// Default name of the colorless secret that holds the active color.
pub const ACTIVE_COLOR_SECRET: &str = "kafka-active-color";

/// Default name of the broker api key secret.
pub const BROKER_API_KEY: &str = "kafka-broker-api-key";

/// Default name of the schema registry api key secret.
pub const SCHEMA_REGISTRY_API_KEY: &str = "kafka-schema-registry-api-key";

/// Prefixes identifying broker credentials.
pub const BROKER_PREFIXES: &[&str] = &["kafka-broker", "broker-"];

/// Prefixes identifying schema registry credentials.
pub const SCHEMA_REGISTRY_PREFIXES: &[&str] = &["kafka-schema-registry", "schema-registry-"];

/// Store locator prefix for JSON snapshot files.
pub const FILE_LOCATOR_PREFIX: &str = "file:";

/// Store locator prefix for Azure Key Vaults.
pub const AZURE_LOCATOR_PREFIX: &str = "az:";

/// Hex characters shown for a value fingerprint.
pub const FINGERPRINT_LEN: usize = 8;

/// Repository names containing this marker are ignored by most fleet commands.
pub const OUTDATED_MARKER: &str = "outdated.";

/// Remote repositories starting with this prefix are never cloned.
pub const OUTDATED_PREFIX: &str = "outdated";

/// Branch that fleet reset and delete fall back to.
pub const MAIN_BRANCH: &str = "master";

/// Upstream ref that fleet reset checks out.
pub const MAIN_UPSTREAM: &str = "origin/master";

/// Azure DevOps base url used when the organization is a bare name.
pub const DEVOPS_BASE_URL: &str = "https://dev.azure.com/";
