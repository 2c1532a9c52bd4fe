//! Streaming service boundary.
//!
//! Every call made on behalf of a user takes that user's [`ActorId`]
//! explicitly. Nothing in this module keeps a "current user".

mod client;
mod models;
mod oauth;

use async_trait::async_trait;
use spotiford_core::{ActorId, Track, UserProfile};

pub use client::{SpotifyClient, SpotifyEndpoints};
pub use oauth::{OAuthConfig, parse_redirect_code};

/// Streaming API errors
#[derive(Debug, thiserror::Error)]
pub enum MusicApiError {
    #[error("User {0} has not linked a Spotify account")]
    NotLinked(ActorId),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Authorization failed: {0}")]
    Auth(String),
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
    #[error("Token store error: {0}")]
    Db(#[from] spotiford_db::DbError),
}

impl MusicApiError {
    /// Errors the service reports for a well-formed request it refused to
    /// carry out (already playing, nothing to skip, no active device).
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Operations the bot needs from the streaming service.
#[async_trait]
pub trait MusicApi: Send + Sync {
    /// Whether the actor has a stored authorization.
    async fn is_linked(&self, actor: ActorId) -> Result<bool, MusicApiError>;

    /// URL the actor opens to grant access.
    fn authorize_url(&self) -> String;

    /// Exchange an authorization code and store the resulting token.
    async fn link_account(&self, actor: ActorId, code: &str)
    -> Result<UserProfile, MusicApiError>;

    /// Catalog search; does not require a linked account.
    async fn search_tracks(&self, query: &str, limit: usize)
    -> Result<Vec<Track>, MusicApiError>;

    async fn current_user(&self, actor: ActorId) -> Result<UserProfile, MusicApiError>;

    /// `None` when nothing is playing.
    async fn currently_playing(&self, actor: ActorId) -> Result<Option<Track>, MusicApiError>;

    async fn is_saved(&self, actor: ActorId, track: &Track) -> Result<bool, MusicApiError>;

    async fn save_track(&self, actor: ActorId, track: &Track) -> Result<(), MusicApiError>;

    async fn remove_track(&self, actor: ActorId, track: &Track) -> Result<(), MusicApiError>;

    async fn enqueue(&self, actor: ActorId, track: &Track) -> Result<(), MusicApiError>;

    /// Resume playback, or start `track` when given.
    async fn play(&self, actor: ActorId, track: Option<&Track>) -> Result<(), MusicApiError>;

    async fn pause(&self, actor: ActorId) -> Result<(), MusicApiError>;

    async fn skip_next(&self, actor: ActorId) -> Result<(), MusicApiError>;

    async fn skip_previous(&self, actor: ActorId) -> Result<(), MusicApiError>;
}
