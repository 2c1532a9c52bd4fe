//! Domain types shared between the token store and the gateway.

use serde::{Deserialize, Serialize};

/// Chat-platform identity of the user who issued a command or a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u64);

impl ActorId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ActorId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A catalog track as presented to the actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier (`spotify:track:...`)
    pub uri: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    /// Album artwork, largest first as returned by the API
    pub image_url: Option<String>,
}

impl Track {
    /// Artist names joined for display.
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}

/// Profile of a linked streaming account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub image_url: Option<String>,
}
