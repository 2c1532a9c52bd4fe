//! Settings configuration loaded from TOML files.
//!
//! This module handles non-sensitive configuration stored in TOML format
//! in the XDG config directory (~/.config/spotiford/config.toml).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Largest number of candidates a track selection can present.
pub const MAX_SEARCH_LIMIT: usize = 5;

/// Default TOML configuration file content
const DEFAULT_CONFIG_TOML: &str = r#"# spotiford configuration file
# Located at: ~/.config/spotiford/config.toml
#
# This file contains non-sensitive configuration.
# Secrets are loaded from environment variables:
#   - DISCORD_BOT_TOKEN
#   - SPOTIFY_CLIENT_ID
#   - SPOTIFY_CLIENT_SECRET

[discord]
command_prefix = "-"

[spotify]
redirect_uri = "http://localhost:8080"
search_limit = 5
scopes = [
  "user-read-email",
  "streaming",
  "user-read-currently-playing",
  "user-read-playback-state",
  "user-modify-playback-state",
  "user-library-read",
  "user-library-modify",
]

[database]
# path = "/var/lib/spotiford/spotiford.sqlite3"

[logging]
level = "info"
"#;

/// Settings loaded from TOML configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Discord bot configuration
    #[serde(default)]
    pub discord: DiscordSettings,

    /// Spotify Web API configuration
    #[serde(default)]
    pub spotify: SpotifySettings,

    /// Token store configuration
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Discord bot settings
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordSettings {
    /// Prefix that marks a message as a bot command
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

/// Spotify Web API settings
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifySettings {
    /// OAuth redirect URI registered for the Spotify application
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// OAuth scopes requested when linking an account
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Number of search results offered for selection (1..=5)
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

/// Token store settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file path (defaults to the user data directory)
    pub path: Option<PathBuf>,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_command_prefix() -> String {
    "-".to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost:8080".to_string()
}

fn default_scopes() -> Vec<String> {
    [
        "user-read-email",
        "streaming",
        "user-read-currently-playing",
        "user-read-playback-state",
        "user-modify-playback-state",
        "user-library-read",
        "user-library-modify",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_search_limit() -> usize {
    MAX_SEARCH_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DiscordSettings {
    fn default() -> Self {
        Self {
            command_prefix: default_command_prefix(),
        }
    }
}

impl Default for SpotifySettings {
    fn default() -> Self {
        Self {
            redirect_uri: default_redirect_uri(),
            scopes: default_scopes(),
            search_limit: default_search_limit(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SpotifySettings {
    /// Search limit clamped to what a selection can present.
    pub fn effective_search_limit(&self) -> usize {
        self.search_limit.clamp(1, MAX_SEARCH_LIMIT)
    }
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error("Command prefix must not be empty")]
    EmptyCommandPrefix,
}

impl Settings {
    /// Load settings from the TOML configuration file.
    ///
    /// If the config file doesn't exist, creates it with default values.
    pub fn load() -> Result<Self, SettingsError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("Creating default configuration at {:?}", config_path);
            Self::create_default_config(&config_path)?;
        }

        let content = fs::read_to_string(&config_path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        if settings.discord.command_prefix.trim().is_empty() {
            return Err(SettingsError::EmptyCommandPrefix);
        }
        Ok(settings)
    }

    /// Get the configuration file path.
    ///
    /// Uses `SPOTIFORD_CONFIG_DIR` when set, otherwise the XDG config directory.
    pub fn config_path() -> Result<PathBuf, SettingsError> {
        if let Ok(override_dir) = std::env::var("SPOTIFORD_CONFIG_DIR") {
            return Ok(PathBuf::from(override_dir).join("config.toml"));
        }

        let config_dir = dirs::config_dir()
            .ok_or(SettingsError::ConfigDirNotFound)?
            .join("spotiford");

        Ok(config_dir.join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, DEFAULT_CONFIG_TOML)?;

        Ok(())
    }
}
