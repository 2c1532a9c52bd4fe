pub mod config;
pub mod model;

// Config re-exports
pub use config::{
    Config, ConfigError, DatabaseSettings, DiscordSettings, LoggingSettings, MAX_SEARCH_LIMIT,
    Secrets, SecretsError, Settings, SettingsError, SpotifySettings,
};

// Model re-exports
pub use model::{ActorId, Track, UserProfile};
