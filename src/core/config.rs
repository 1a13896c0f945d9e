//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.chatdeck/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatdeckConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GenerationConfig {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Slider ranges for the parameter controls.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ControlsConfig {
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
    pub temperature_step: Option<f64>,
    pub max_tokens_min: Option<u32>,
    pub max_tokens_max: Option<u32>,
    pub max_tokens_step: Option<u32>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5001";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

pub const DEFAULT_TEMPERATURE_MIN: f64 = 0.0;
pub const DEFAULT_TEMPERATURE_MAX: f64 = 1.0;
pub const DEFAULT_TEMPERATURE_STEP: f64 = 0.1;
pub const DEFAULT_MAX_TOKENS_MIN: u32 = 100;
pub const DEFAULT_MAX_TOKENS_MAX: u32 = 4000;
pub const DEFAULT_MAX_TOKENS_STEP: u32 = 1;

const SERVER_URL_ENV: &str = "CHATDECK_SERVER_URL";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub temperature: f64,
    pub max_tokens: u32,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub temperature_step: f64,
    pub max_tokens_min: u32,
    pub max_tokens_max: u32,
    pub max_tokens_step: u32,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve_with_env(&ChatdeckConfig::default(), &Overrides::default(), None)
    }
}

/// Values given on the command line. `None` means not specified.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub server_url: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
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

/// Returns the path to `~/.chatdeck/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".chatdeck").join("config.toml"))
}

/// Load config from `~/.chatdeck/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatdeckConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChatdeckConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ChatdeckConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ChatdeckConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ChatdeckConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChatdeckConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG: &str = r#"# Chatdeck Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# base_url = "http://localhost:5001"   # Or set CHATDECK_SERVER_URL
# request_timeout_secs = 120

# [generation]
# temperature = 0.7
# max_tokens = 1000

# [controls]
# temperature_min = 0.0
# temperature_max = 1.0
# temperature_step = 0.1
# max_tokens_min = 100
# max_tokens_max = 4000
# max_tokens_step = 1
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChatdeckConfig, overrides: &Overrides) -> ResolvedConfig {
    let env_url = std::env::var(SERVER_URL_ENV).ok();
    resolve_with_env(config, overrides, env_url)
}

fn resolve_with_env(
    config: &ChatdeckConfig,
    overrides: &Overrides,
    env_url: Option<String>,
) -> ResolvedConfig {
    // Server URL: CLI → env → config → default
    let server_url = overrides
        .server_url
        .clone()
        .or(env_url)
        .or_else(|| config.server.base_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let controls = &config.controls;
    ResolvedConfig {
        server_url,
        request_timeout_secs: config
            .server
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        temperature: overrides
            .temperature
            .or(config.generation.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens: overrides
            .max_tokens
            .or(config.generation.max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS),
        temperature_min: controls.temperature_min.unwrap_or(DEFAULT_TEMPERATURE_MIN),
        temperature_max: controls.temperature_max.unwrap_or(DEFAULT_TEMPERATURE_MAX),
        temperature_step: controls.temperature_step.unwrap_or(DEFAULT_TEMPERATURE_STEP),
        max_tokens_min: controls.max_tokens_min.unwrap_or(DEFAULT_MAX_TOKENS_MIN),
        max_tokens_max: controls.max_tokens_max.unwrap_or(DEFAULT_MAX_TOKENS_MAX),
        max_tokens_step: controls.max_tokens_step.unwrap_or(DEFAULT_MAX_TOKENS_STEP),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = ChatdeckConfig::default();
        assert!(config.server.base_url.is_none());
        assert!(config.generation.temperature.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&ChatdeckConfig::default(), &Overrides::default(), None);
        assert_eq!(resolved.server_url, DEFAULT_SERVER_URL);
        assert_eq!(resolved.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(resolved.temperature, 0.7);
        assert_eq!(resolved.max_tokens, 1000);
        assert_eq!(resolved.max_tokens_step, 1);
    }

    #[test]
    fn test_env_beats_config_file() {
        let config = ChatdeckConfig {
            server: ServerConfig {
                base_url: Some("http://from-file:5001".to_string()),
                request_timeout_secs: None,
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(
            &config,
            &Overrides::default(),
            Some("http://from-env:5001".to_string()),
        );
        assert_eq!(resolved.server_url, "http://from-env:5001");
    }

    #[test]
    fn test_cli_wins_over_everything() {
        let config = ChatdeckConfig {
            generation: GenerationConfig {
                temperature: Some(0.2),
                max_tokens: Some(500),
            },
            ..Default::default()
        };
        let overrides = Overrides {
            server_url: Some("http://cli:9000".to_string()),
            temperature: Some(0.9),
            max_tokens: None,
        };
        let resolved = resolve_with_env(&config, &overrides, Some("http://env:1".to_string()));
        assert_eq!(resolved.server_url, "http://cli:9000");
        assert_eq!(resolved.temperature, 0.9);
        assert_eq!(resolved.max_tokens, 500);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[server]
base_url = "http://192.168.1.20:5001"
request_timeout_secs = 30

[generation]
temperature = 0.4
max_tokens = 2000

[controls]
max_tokens_step = 50
"#;
        let config: ChatdeckConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.server.base_url.as_deref(),
            Some("http://192.168.1.20:5001")
        );
        assert_eq!(config.server.request_timeout_secs, Some(30));
        assert_eq!(config.generation.max_tokens, Some(2000));
        assert_eq!(config.controls.max_tokens_step, Some(50));
        assert!(config.controls.temperature_step.is_none());
    }

    #[test]
    fn test_generated_default_is_all_comments() {
        let config: ChatdeckConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        let resolved = resolve_with_env(&config, &Overrides::default(), None);
        assert_eq!(resolved, ResolvedConfig::default());
    }

    #[test]
    fn test_missing_file_generates_default() {
        let dir = std::env::temp_dir().join(format!("chatdeck-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_dir_all(&dir);

        let config = load_config_from(&path).unwrap();
        assert!(config.server.base_url.is_none());
        assert!(path.exists());

        fs::write(&path, "[server\nbroken").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
