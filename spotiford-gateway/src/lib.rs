//! spotiford-gateway: Discord front end for a linked Spotify account.
//!
//! Commands arrive as prefixed chat messages. Search commands open a
//! selection session (see [`selection`]) that waits for the invoking user to
//! react to a numbered list, then queues, plays or (un)saves the pick.

pub mod chat;
pub mod commands;
pub mod discord;
pub mod messages;
pub mod selection;
pub mod spotify;
pub mod state;

pub use chat::{ChatClient, ChatError, Invocation, MessageHandle, OutgoingMessage, ReactionEvent};
pub use spotify::{MusicApi, MusicApiError, OAuthConfig, SpotifyClient};
pub use state::AppState;
