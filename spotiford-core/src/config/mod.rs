//! Configuration management for spotiford.
//!
//! Secrets come from environment variables, settings from a TOML file.
//!
//! # Configuration Sources
//!
//! ## Secrets (Environment Variables)
//! - `DISCORD_BOT_TOKEN` - Discord bot token
//! - `SPOTIFY_CLIENT_ID` - Spotify application client id
//! - `SPOTIFY_CLIENT_SECRET` - Spotify application client secret
//!
//! ## Settings (TOML File)
//! Located at `~/.config/spotiford/config.toml`:
//! ```toml
//! [discord]
//! command_prefix = "-"
//!
//! [spotify]
//! redirect_uri = "http://localhost:8080"
//! search_limit = 5
//!
//! [logging]
//! level = "info"
//! ```

mod secrets;
mod settings;

use std::path::Path;

pub use secrets::{Secrets, SecretsError};
pub use settings::{
    DatabaseSettings, DiscordSettings, LoggingSettings, MAX_SEARCH_LIMIT, Settings,
    SettingsError, SpotifySettings,
};

/// Combined configuration containing both secrets and settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secrets loaded from environment variables
    pub secrets: Secrets,
    /// Settings loaded from TOML configuration file
    pub settings: Settings,
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Secrets error: {0}")]
    Secrets(#[from] SecretsError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the Spotify credentials are missing or the TOML
    /// file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let secrets = Secrets::from_env()?;
        let settings = Settings::load()?;

        Ok(Self { secrets, settings })
    }

    /// Get the Discord bot token (if configured).
    pub fn discord_bot_token(&self) -> Option<&str> {
        self.secrets.discord_bot_token.as_deref()
    }

    /// Get the command prefix used to recognise bot commands.
    pub fn command_prefix(&self) -> &str {
        &self.settings.discord.command_prefix
    }

    /// Get the explicitly configured database path, if any.
    pub fn database_path(&self) -> Option<&Path> {
        self.settings.database.path.as_deref()
    }

    /// Get the configured log level used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &str {
        &self.settings.logging.level
    }
}
