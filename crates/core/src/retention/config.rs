//! Retention configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the retention sweeper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Enable/disable periodic sweeping.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Time between sweeps (seconds).
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Age past which files become eligible for deletion (seconds).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    3600 // 1 hour
}

fn default_ttl() -> u64 {
    3600 // 1 hour
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval(),
            ttl_secs: default_ttl(),
        }
    }
}

impl RetentionConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RetentionConfig::default();
        assert!(config.enabled);
        assert_eq!(config.interval(), Duration::from_secs(3600));
        assert_eq!(config.ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_deserialize_disabled() {
        let toml = r#"
            enabled = false
        "#;
        let config: RetentionConfig = toml::from_str(toml).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.ttl_secs, 3600);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            enabled = true
            interval_secs = 60
            ttl_secs = 86400
        "#;
        let config: RetentionConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.ttl_secs, 86400);
    }
}
