//! Secrets configuration loaded from environment variables only.
//!
//! This module handles sensitive configuration like the Discord bot token and
//! the Spotify application credentials. These values are never read from or
//! written to the TOML settings file.

use std::env;

/// Secrets loaded exclusively from environment variables.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    /// Discord bot token (env: DISCORD_BOT_TOKEN)
    pub discord_bot_token: Option<String>,

    /// Spotify application client id (env: SPOTIFY_CLIENT_ID)
    pub spotify_client_id: String,

    /// Spotify application client secret (env: SPOTIFY_CLIENT_SECRET)
    pub spotify_client_secret: String,
}

/// Errors that can occur when loading secrets
#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    #[error("Missing required secret: {0}")]
    MissingSecret(&'static str),
}

impl Secrets {
    /// Load secrets from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for development.
    pub fn from_env() -> Result<Self, SecretsError> {
        let _ = dotenvy::dotenv();

        Self::from_env_inner()
    }

    /// Internal method to load from environment without loading .env
    pub(crate) fn from_env_inner() -> Result<Self, SecretsError> {
        Ok(Self {
            discord_bot_token: non_empty_var("DISCORD_BOT_TOKEN"),
            spotify_client_id: non_empty_var("SPOTIFY_CLIENT_ID")
                .ok_or(SecretsError::MissingSecret("SPOTIFY_CLIENT_ID"))?,
            spotify_client_secret: non_empty_var("SPOTIFY_CLIENT_SECRET")
                .ok_or(SecretsError::MissingSecret("SPOTIFY_CLIENT_SECRET"))?,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{ENV_MUTEX, clear_env};

    #[test]
    fn test_load_all_secrets() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var("DISCORD_BOT_TOKEN", "discord-token");
            env::set_var("SPOTIFY_CLIENT_ID", "client-id");
            env::set_var("SPOTIFY_CLIENT_SECRET", "client-secret");
        }

        let secrets = Secrets::from_env_inner().unwrap();
        assert_eq!(secrets.discord_bot_token.as_deref(), Some("discord-token"));
        assert_eq!(secrets.spotify_client_id, "client-id");
        assert_eq!(secrets.spotify_client_secret, "client-secret");
    }

    #[test]
    fn test_discord_token_is_optional() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var("SPOTIFY_CLIENT_ID", "client-id");
            env::set_var("SPOTIFY_CLIENT_SECRET", "client-secret");
        }

        let secrets = Secrets::from_env_inner().unwrap();
        assert!(secrets.discord_bot_token.is_none());
    }

    #[test]
    fn test_missing_spotify_secret() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe { env::set_var("SPOTIFY_CLIENT_ID", "client-id") }

        let result = Secrets::from_env_inner();
        assert!(matches!(
            result.unwrap_err(),
            SecretsError::MissingSecret("SPOTIFY_CLIENT_SECRET")
        ));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var("SPOTIFY_CLIENT_ID", "  ");
            env::set_var("SPOTIFY_CLIENT_SECRET", "client-secret");
        }

        let result = Secrets::from_env_inner();
        assert!(matches!(
            result.unwrap_err(),
            SecretsError::MissingSecret("SPOTIFY_CLIENT_ID")
        ));
    }
}
