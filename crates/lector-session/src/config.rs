//! Configuration for the extraction session

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default file name for exported results
pub const DEFAULT_EXPORT_FILE_NAME: &str = "extracted_text.json";

/// Configuration for the session workbench
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Upper bound on a single extraction call (seconds); `None` or 0 waits forever
    pub request_timeout_secs: Option<u64>,

    /// How long a notice stays visible unless it asks for longer (milliseconds)
    pub notice_duration_ms: u64,

    /// File name used for exports
    pub export_file_name: String,
}

impl SessionConfig {
    /// Get the extraction timeout, if bounded
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Get the default notice duration
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.notice_duration_ms == 0 {
            return Err("notice_duration_ms must be greater than 0".to_string());
        }
        if self.export_file_name.trim().is_empty() {
            return Err("export_file_name must not be empty".to_string());
        }
        if self.export_file_name.contains(['/', '\\']) {
            return Err("export_file_name must be a bare file name".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: Some(300),
            notice_duration_ms: 3000,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_zero_timeout_is_unbounded() {
        let config = SessionConfig {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_invalid_export_name() {
        let mut config = SessionConfig::default();
        config.export_file_name = "../escape.json".to_string();
        assert!(config.validate().is_err());

        config.export_file_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SessionConfig::from_toml("notice_duration_ms = 1500").unwrap();
        assert_eq!(config.notice_duration_ms, 1500);
        assert_eq!(config.export_file_name, DEFAULT_EXPORT_FILE_NAME);
        assert_eq!(config.request_timeout_secs, Some(300));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SessionConfig {
            request_timeout_secs: Some(42),
            ..Default::default()
        };
        let parsed = SessionConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }
}
