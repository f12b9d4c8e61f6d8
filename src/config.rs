//! Configuration loading via `ortho-config`.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Default time budget for one refresh, in seconds.
pub const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 30;

/// Default time budget for cleanup at shutdown, in seconds.
pub const DEFAULT_CLEANUP_TIMEOUT_SECS: u64 = 10;

/// Rancher backend settings derived from environment variables,
/// configuration files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "RANCHER",
    discovery(
        app_name = "ranchscale",
        env_var = "RANCHSCALE_CONFIG_PATH",
        config_file_name = "ranchscale.toml",
        dotfile_name = ".ranchscale.toml",
        project_file_name = "ranchscale.toml"
    )
)]
pub struct RancherConfig {
    /// Identifier of the Rancher cluster whose node pools are managed.
    pub cluster_id: String,
    /// Upper bound on a single refresh, in seconds.
    #[ortho_config(default = DEFAULT_REFRESH_TIMEOUT_SECS)]
    pub refresh_timeout_secs: u64,
    /// Upper bound on cleanup at shutdown, in seconds.
    #[ortho_config(default = DEFAULT_CLEANUP_TIMEOUT_SECS)]
    pub cleanup_timeout_secs: u64,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    fn missing(&self) -> ConfigError {
        ConfigError::MissingField(format!(
            "missing {}: set {} or add {} to ranchscale.toml",
            self.description, self.env_var, self.toml_key
        ))
    }
}

impl RancherConfig {
    /// Creates a configuration for `cluster_id` with default timeouts.
    #[must_use]
    pub fn for_cluster(cluster_id: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            refresh_timeout_secs: DEFAULT_REFRESH_TIMEOUT_SECS,
            cleanup_timeout_secs: DEFAULT_CLEANUP_TIMEOUT_SECS,
        }
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("ranchscale")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Time budget for one refresh.
    #[must_use]
    pub const fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_secs)
    }

    /// Time budget for cleanup.
    #[must_use]
    pub const fn cleanup_timeout(&self) -> Duration {
        Duration::from_secs(self.cleanup_timeout_secs)
    }

    /// Performs semantic validation. Error messages name the environment
    /// variable and configuration key that supply each value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the cluster id is blank and
    /// [`ConfigError::InvalidTimeout`] when a timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cluster_id.trim().is_empty() {
            return Err(FieldMetadata::new(
                "Rancher cluster ID",
                "RANCHER_CLUSTER_ID",
                "cluster_id",
            )
            .missing());
        }
        if self.refresh_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                field: String::from("refresh_timeout_secs"),
            });
        }
        if self.cleanup_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                field: String::from("cleanup_timeout_secs"),
            });
        }
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a timeout that would never allow the operation to run.
    #[error("{field} must be greater than zero")]
    InvalidTimeout {
        /// Offending field.
        field: String,
    },
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
