//! Configuration loading and management
//!
//! Handles parsing of `taskdeck.toml` from the data directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Activity feed configuration
    #[serde(default)]
    pub activity: ActivityConfig,

    /// Watch-mode refresh configuration
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Task defaults
    #[serde(default)]
    pub tasks: TasksConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            activity: ActivityConfig::default(),
            refresh: RefreshConfig::default(),
            tasks: TasksConfig::default(),
        }
    }
}

/// Activity feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Number of entries retained per user, newest first
    #[serde(default = "default_activity_limit")]
    pub limit: usize,
}

fn default_activity_limit() -> usize {
    20
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            limit: default_activity_limit(),
        }
    }
}

/// Watch-mode refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between re-reads of the store in `--watch` mode
    #[serde(default = "default_refresh_interval")]
    pub interval_secs: u64,
}

fn default_refresh_interval() -> u64 {
    15
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval(),
        }
    }
}

/// Task defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Priority assigned when none is given
    #[serde(default = "default_task_priority")]
    pub default_priority: String,
}

fn default_task_priority() -> String {
    "Medium".to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_priority: default_task_priority(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join("taskdeck.toml");
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.activity.limit == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "activity.limit must be at least 1".to_string(),
            ));
        }
        if self.refresh.interval_secs == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "refresh.interval_secs must be at least 1".to_string(),
            ));
        }
        crate::task::Priority::parse(&self.tasks.default_priority).map_err(|_| {
            crate::error::Error::InvalidConfig(format!(
                "tasks.default_priority: unknown priority '{}' (expected Low|Medium|High)",
                self.tasks.default_priority
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_behavior() {
        let config = Config::default();
        assert_eq!(config.activity.limit, 20);
        assert_eq!(config.refresh.interval_secs, 15);
        assert_eq!(config.tasks.default_priority, "Medium");
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("taskdeck.toml");
        let content = r#"
[activity]
limit = 5

[refresh]
interval_secs = 60

[tasks]
default_priority = "High"
"#;
        std::fs::write(&path, content).expect("write config");

        let config = Config::load(&path).expect("load config");
        assert_eq!(config.activity.limit, 5);
        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.tasks.default_priority, "High");
    }

    #[test]
    fn load_rejects_zero_limits() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("taskdeck.toml");
        std::fs::write(&path, "[activity]\nlimit = 0\n").expect("write config");

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn load_from_dir_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_from_dir(dir.path());
        assert_eq!(config.activity.limit, 20);
    }
}
