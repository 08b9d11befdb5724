//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.dana/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DanaConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub quick_replies: Option<Vec<String>>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// The three suggested questions shown on the welcome panel.
pub fn default_quick_replies() -> Vec<String> {
    vec![
        "Show me the first 5 rows and describe the columns.".to_string(),
        "Check for missing values and show them in a table.".to_string(),
        "Show the correlation matrix for numeric columns.".to_string(),
    ]
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub server_url: String,
    pub quick_replies: Vec<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.dana/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".dana").join("config.toml"))
}

/// Load config from `~/.dana/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DanaConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<DanaConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(DanaConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(DanaConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: DanaConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Dana Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# base_url = "http://127.0.0.1:8000"   # Or set DANA_SERVER_URL env var

# [ui]
# quick_replies = [
#     "Show me the first 5 rows and describe the columns.",
#     "Check for missing values and show them in a table.",
#     "Show the correlation matrix for numeric columns.",
# ]
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_server` is the `--server` flag (None = not specified).
pub fn resolve(config: &DanaConfig, cli_server: Option<&str>) -> ResolvedConfig {
    // Server URL: CLI → env → config → default
    let server_url = cli_server
        .map(|s| s.to_string())
        .or_else(|| std::env::var("DANA_SERVER_URL").ok())
        .or_else(|| config.server.base_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let quick_replies = config
        .ui
        .quick_replies
        .clone()
        .filter(|qr| !qr.is_empty())
        .unwrap_or_else(default_quick_replies);

    ResolvedConfig {
        server_url,
        quick_replies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = DanaConfig::default();
        assert!(config.server.base_url.is_none());
        assert!(config.ui.quick_replies.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = DanaConfig::default();
        let resolved = resolve(&config, None);
        assert_eq!(resolved.server_url, DEFAULT_SERVER_URL);
        assert_eq!(resolved.quick_replies.len(), 3);
        assert!(resolved.quick_replies[0].contains("first 5 rows"));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = DanaConfig {
            server: ServerConfig {
                base_url: Some("http://analyst.local:9000".to_string()),
            },
            ui: UiConfig {
                quick_replies: Some(vec!["Summarize the data.".to_string()]),
            },
        };
        let resolved = resolve(&config, None);
        assert_eq!(resolved.server_url, "http://analyst.local:9000");
        assert_eq!(resolved.quick_replies, vec!["Summarize the data."]);
    }

    #[test]
    fn test_resolve_cli_server_wins() {
        let config = DanaConfig {
            server: ServerConfig {
                base_url: Some("http://from-config:8000".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, Some("http://from-cli:8000"));
        assert_eq!(resolved.server_url, "http://from-cli:8000");
    }

    #[test]
    fn test_empty_quick_replies_fall_back_to_defaults() {
        let config = DanaConfig {
            ui: UiConfig {
                quick_replies: Some(vec![]),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, None);
        assert_eq!(resolved.quick_replies.len(), 3);
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing — everything else stays default
        let toml_str = r#"
[server]
base_url = "http://10.0.0.5:8000"
"#;
        let config: DanaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.server.base_url.as_deref(),
            Some("http://10.0.0.5:8000")
        );
        assert!(config.ui.quick_replies.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[server]
base_url = "http://127.0.0.1:8000"

[ui]
quick_replies = ["Overview please.", "Any missing values?"]
"#;
        let config: DanaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.ui.quick_replies.as_ref().map(|q| q.len()),
            Some(2)
        );
        let resolved = resolve(&config, None);
        assert_eq!(resolved.quick_replies[1], "Any missing values?");
    }
}
