//! Configuration loading
//!
//! An optional TOML file supplies defaults; CLI flags override them.
//!
//! ```toml
//! [provider]
//! api_key = "..."
//! model = "gemini-pro"
//!
//! [server]
//! address = "127.0.0.1:3000"
//!
//! [history]
//! dir = "./history"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::Result;

/// Placeholder shipped in sample configs; treated as "no key"
pub const API_KEY_PLACEHOLDER: &str = "YOUR_GEMINI_API_KEY_HERE";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl Config {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Remote analysis provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// API key; empty or the placeholder disables the provider
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL up to and including the API version
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ProviderConfig {
    /// Usable API key, if any
    pub fn usable_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != API_KEY_PLACEHOLDER)
    }

}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: default_address() }
    }
}

fn default_address() -> String {
    "127.0.0.1:3000".to_string()
}

/// Used when a per-user CLI run has no configured history directory
pub const DEFAULT_HISTORY_DIR: &str = "./history";

/// History storage settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryConfig {
    /// Directory for JSON history files; in-memory when unset
    #[serde(default)]
    pub dir: Option<String>,
}

impl HistoryConfig {
    /// Directory to persist to. With `persist` set, an unset `dir` falls
    /// back to `DEFAULT_HISTORY_DIR` instead of memory.
    pub fn resolve_dir(&self, persist: bool) -> Option<&str> {
        match self.dir.as_deref() {
            Some(dir) => Some(dir),
            None if persist => Some(DEFAULT_HISTORY_DIR),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.address, "127.0.0.1:3000");
        assert_eq!(config.provider.model, "gemini-pro");
        assert_eq!(config.provider.timeout_secs, 30);
        assert!(config.provider.usable_key().is_none());
        assert!(config.history.dir.is_none());
    }

    #[test]
    fn test_placeholder_key_disables_provider() {
        let config = Config::parse(
            r#"
            [provider]
            api_key = "YOUR_GEMINI_API_KEY_HERE"
            "#,
        )
        .unwrap();
        assert!(config.provider.usable_key().is_none());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            [provider]
            api_key = "abc123"
            model = "gemini-1.5-flash"
            timeout_secs = 5

            [server]
            address = "0.0.0.0:8080"

            [history]
            dir = "/tmp/history"
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.usable_key(), Some("abc123"));
        assert_eq!(config.provider.model, "gemini-1.5-flash");
        assert_eq!(config.provider.timeout_secs, 5);
        assert_eq!(config.server.address, "0.0.0.0:8080");
        assert_eq!(config.history.dir.as_deref(), Some("/tmp/history"));
    }

    #[test]
    fn test_history_dir_resolution() {
        let unset = HistoryConfig::default();
        assert_eq!(unset.resolve_dir(false), None);
        assert_eq!(unset.resolve_dir(true), Some(DEFAULT_HISTORY_DIR));

        let set = HistoryConfig { dir: Some("/var/lib/biaslens".to_string()) };
        assert_eq!(set.resolve_dir(false), Some("/var/lib/biaslens"));
        assert_eq!(set.resolve_dir(true), Some("/var/lib/biaslens"));
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = Config::parse("[provider\nmodel = 1").unwrap_err();
        assert!(matches!(err, crate::BiasLensError::Configuration(_)));
    }
}
