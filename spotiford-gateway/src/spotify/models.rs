//! Spotify Web API payloads.

use serde::Deserialize;
use spotiford_core::{Track, UserProfile};

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    #[serde(default)]
    pub tracks: Option<Paging<TrackObject>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TrackObject {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
    #[serde(default)]
    pub album: Option<AlbumObject>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ArtistObject {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AlbumObject {
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageObject>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImageObject {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CurrentlyPlaying {
    #[serde(default)]
    pub item: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PrivateUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageObject>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct OAuthErrorBody {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl From<TrackObject> for Track {
    fn from(track: TrackObject) -> Self {
        let (album, image_url) = match track.album {
            Some(album) => {
                let image = album.images.into_iter().next().map(|image| image.url);
                (album.name, image)
            }
            None => (String::new(), None),
        };

        Track {
            uri: track.uri,
            name: track.name,
            artists: track.artists.into_iter().map(|artist| artist.name).collect(),
            album,
            image_url,
        }
    }
}

impl From<PrivateUser> for UserProfile {
    fn from(user: PrivateUser) -> Self {
        UserProfile {
            display_name: user.display_name.unwrap_or_else(|| user.id.clone()),
            id: user.id,
            image_url: user.images.into_iter().next().map(|image| image.url),
        }
    }
}
