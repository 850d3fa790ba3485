//! Engine configuration.
//!
//! This module provides utilities for reading engine settings from a TOML
//! configuration file or environment variables, with serde defaults for
//! everything so an empty config is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::repository::RepositoryError;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How many days ahead template availability is kept materialized.
    pub horizon_days: i64,
    /// Maximum sync queue entries claimed per batch run.
    pub sync_batch_limit: usize,
    /// Free-cancellation cutoff: refunds are owed at or above this many
    /// hours before the booking start.
    pub cancellation_cutoff_hours: i64,
    /// Hard cap on candidate instances one recurring series may produce.
    pub max_recurring_instances: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            sync_batch_limit: default_sync_batch_limit(),
            cancellation_cutoff_hours: default_cancellation_cutoff_hours(),
            max_recurring_instances: default_max_recurring_instances(),
        }
    }
}

fn default_horizon_days() -> i64 {
    180
}

fn default_sync_batch_limit() -> usize {
    25
}

fn default_cancellation_cutoff_hours() -> i64 {
    48
}

fn default_max_recurring_instances() -> usize {
    366
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location, falling back to
    /// defaults when no file exists.
    ///
    /// Searches for `scheduler.toml` in the current and parent directory.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("scheduler.toml"),
            PathBuf::from("../scheduler.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from environment variables, layered over the file
    /// config from the default location (or the built-in defaults when no
    /// file exists).
    ///
    /// Recognized variables: `SCHEDULER_HORIZON_DAYS`,
    /// `SCHEDULER_SYNC_BATCH_LIMIT`, `SCHEDULER_CANCELLATION_CUTOFF_HOURS`,
    /// `SCHEDULER_MAX_RECURRING_INSTANCES`.
    pub fn from_env() -> Result<Self, RepositoryError> {
        let mut config = Self::from_default_location()?;

        if let Some(value) = env_parse::<i64>("SCHEDULER_HORIZON_DAYS")? {
            config.horizon_days = value;
        }
        if let Some(value) = env_parse::<usize>("SCHEDULER_SYNC_BATCH_LIMIT")? {
            config.sync_batch_limit = value;
        }
        if let Some(value) = env_parse::<i64>("SCHEDULER_CANCELLATION_CUTOFF_HOURS")? {
            config.cancellation_cutoff_hours = value;
        }
        if let Some(value) = env_parse::<usize>("SCHEDULER_MAX_RECURRING_INSTANCES")? {
            config.max_recurring_instances = value;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        if self.horizon_days <= 0 {
            return Err(RepositoryError::configuration(
                "horizon_days must be positive",
            ));
        }
        if self.sync_batch_limit == 0 {
            return Err(RepositoryError::configuration(
                "sync_batch_limit must be positive",
            ));
        }
        if self.cancellation_cutoff_hours < 0 {
            return Err(RepositoryError::configuration(
                "cancellation_cutoff_hours must not be negative",
            ));
        }
        if self.max_recurring_instances == 0 {
            return Err(RepositoryError::configuration(
                "max_recurring_instances must be positive",
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, RepositoryError> {
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            RepositoryError::configuration(format!("Invalid value for {}: {}", key, raw))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.horizon_days, 180);
        assert_eq!(config.sync_batch_limit, 25);
        assert_eq!(config.cancellation_cutoff_hours, 48);
        assert_eq!(config.max_recurring_instances, 366);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: EngineConfig = toml::from_str("horizon_days = 30\n").unwrap();
        assert_eq!(config.horizon_days, 30);
        assert_eq!(config.sync_batch_limit, 25);
    }

    #[test]
    fn test_validate_rejects_zero_horizon() {
        let config = EngineConfig {
            horizon_days: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_error_but_missing_default_is_not() {
        assert!(EngineConfig::from_file("/nonexistent/scheduler.toml").is_err());

        // No scheduler.toml in the test working directory: defaults apply.
        let config = EngineConfig::from_default_location().unwrap();
        assert_eq!(config.horizon_days, 180);
    }
}
