use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::json;
use spotiford_core::{ActorId, Track, UserProfile};
use spotiford_db::{StoredToken, TokenDbPool, TokenRepository};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::models::{
    ApiErrorEnvelope, CurrentlyPlaying, PrivateUser, SearchResponse, TokenResponse,
};
use super::{MusicApi, MusicApiError, OAuthConfig};

/// Refresh user tokens this long before they expire.
const REFRESH_MARGIN_SECS: i64 = 60;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Base URLs of the two Spotify services the client talks to.
#[derive(Debug, Clone)]
pub struct SpotifyEndpoints {
    pub api_base: String,
    pub accounts_base: String,
}

impl Default for SpotifyEndpoints {
    fn default() -> Self {
        Self {
            api_base: "https://api.spotify.com/v1".to_string(),
            accounts_base: "https://accounts.spotify.com".to_string(),
        }
    }
}

struct AppToken {
    access_token: String,
    expires_at: i64,
}

/// Spotify Web API client backed by the SQLite token store.
pub struct SpotifyClient {
    http: reqwest::Client,
    oauth: OAuthConfig,
    endpoints: SpotifyEndpoints,
    tokens: TokenDbPool,
    app_token: Mutex<Option<AppToken>>,
}

impl SpotifyClient {
    pub fn new(oauth: OAuthConfig, tokens: TokenDbPool) -> Result<Self, MusicApiError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            oauth,
            endpoints: SpotifyEndpoints::default(),
            tokens,
            app_token: Mutex::new(None),
        })
    }

    /// Point the client at different service URLs (used by tests).
    pub fn with_endpoints(mut self, endpoints: SpotifyEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.api_base.trim_end_matches('/'), path)
    }

    async fn store_token(
        &self,
        actor: ActorId,
        response: TokenResponse,
        previous_refresh: Option<String>,
    ) -> Result<StoredToken, MusicApiError> {
        let token = StoredToken {
            actor,
            access_token: response.access_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
            refresh_token: response.refresh_token.or(previous_refresh),
            scope: response.scope,
            expires_at: Utc::now().timestamp() + response.expires_in,
        };
        TokenRepository::upsert(self.tokens.pool(), &token).await?;
        Ok(token)
    }

    /// Access token for `actor`, refreshed when close to expiry.
    async fn user_token(&self, actor: ActorId) -> Result<String, MusicApiError> {
        let stored = TokenRepository::get(self.tokens.pool(), actor)
            .await?
            .ok_or(MusicApiError::NotLinked(actor))?;

        if !stored.expires_within(Utc::now().timestamp(), REFRESH_MARGIN_SECS) {
            return Ok(stored.access_token);
        }

        let refresh_token = stored
            .refresh_token
            .ok_or_else(|| MusicApiError::Auth("stored token cannot be refreshed".to_string()))?;
        debug!("Refreshing Spotify token for user {}", actor);
        let response = self
            .oauth
            .refresh(&self.http, &self.endpoints.accounts_base, &refresh_token)
            .await?;
        let token = self.store_token(actor, response, Some(refresh_token)).await?;
        Ok(token.access_token)
    }

    /// Application token for catalog requests (client-credentials flow).
    async fn app_token(&self) -> Result<String, MusicApiError> {
        let mut cached = self.app_token.lock().await;
        let now = Utc::now().timestamp();
        if let Some(token) = cached.as_ref().filter(|t| t.expires_at - REFRESH_MARGIN_SECS > now) {
            return Ok(token.access_token.clone());
        }

        let response = self
            .oauth
            .client_credentials(&self.http, &self.endpoints.accounts_base)
            .await?;
        let access_token = response.access_token.clone();
        *cached = Some(AppToken {
            access_token: response.access_token,
            expires_at: now + response.expires_in,
        });
        Ok(access_token)
    }

    async fn user_request(
        &self,
        actor: ActorId,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, MusicApiError> {
        let token = self.user_token(actor).await?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    async fn profile(&self, access_token: &str) -> Result<UserProfile, MusicApiError> {
        let request = self.http.get(self.url("/me")).bearer_auth(access_token);
        let user: PrivateUser = Self::send(request)
            .await?
            .json()
            .await
            .map_err(|e| MusicApiError::InvalidResponse(e.to_string()))?;
        Ok(user.into())
    }

    async fn send(request: RequestBuilder) -> Result<Response, MusicApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);
        Err(MusicApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn player_command(
        &self,
        actor: ActorId,
        method: Method,
        path: &str,
    ) -> Result<(), MusicApiError> {
        let request = self
            .user_request(actor, method, path)
            .await?
            .header(CONTENT_LENGTH, 0);
        Self::send(request).await?;
        Ok(())
    }
}

/// Track id from a `spotify:track:<id>` URI.
fn track_id(track: &Track) -> &str {
    track.uri.rsplit(':').next().unwrap_or(&track.uri)
}

#[async_trait]
impl MusicApi for SpotifyClient {
    async fn is_linked(&self, actor: ActorId) -> Result<bool, MusicApiError> {
        Ok(TokenRepository::has_user(self.tokens.pool(), actor).await?)
    }

    fn authorize_url(&self) -> String {
        self.oauth.authorize_url(&self.endpoints.accounts_base)
    }

    async fn link_account(
        &self,
        actor: ActorId,
        code: &str,
    ) -> Result<UserProfile, MusicApiError> {
        let response = self
            .oauth
            .exchange_code(&self.http, &self.endpoints.accounts_base, code)
            .await?;
        // Only a token that can read the profile gets stored.
        let profile = self.profile(&response.access_token).await?;
        self.store_token(actor, response, None).await?;
        info!("Linked Spotify account for user {}", actor);

        Ok(profile)
    }

    async fn search_tracks(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Track>, MusicApiError> {
        let token = self.app_token().await?;
        let limit = limit.to_string();
        let request = self
            .http
            .get(self.url("/search"))
            .bearer_auth(token)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())]);

        let payload: SearchResponse = Self::send(request)
            .await?
            .json()
            .await
            .map_err(|e| MusicApiError::InvalidResponse(e.to_string()))?;

        Ok(payload
            .tracks
            .map(|paging| paging.items.into_iter().map(Track::from).collect())
            .unwrap_or_default())
    }

    async fn current_user(&self, actor: ActorId) -> Result<UserProfile, MusicApiError> {
        let token = self.user_token(actor).await?;
        self.profile(&token).await
    }

    async fn currently_playing(&self, actor: ActorId) -> Result<Option<Track>, MusicApiError> {
        let request = self
            .user_request(actor, Method::GET, "/me/player/currently-playing")
            .await?;
        let response = Self::send(request).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let playing: CurrentlyPlaying = response
            .json()
            .await
            .map_err(|e| MusicApiError::InvalidResponse(e.to_string()))?;
        Ok(playing.item.map(Track::from))
    }

    async fn is_saved(&self, actor: ActorId, track: &Track) -> Result<bool, MusicApiError> {
        let request = self
            .user_request(actor, Method::GET, "/me/tracks/contains")
            .await?
            .query(&[("ids", track_id(track))]);
        let flags: Vec<bool> = Self::send(request)
            .await?
            .json()
            .await
            .map_err(|e| MusicApiError::InvalidResponse(e.to_string()))?;

        flags
            .first()
            .copied()
            .ok_or_else(|| MusicApiError::InvalidResponse("empty contains response".to_string()))
    }

    async fn save_track(&self, actor: ActorId, track: &Track) -> Result<(), MusicApiError> {
        let request = self
            .user_request(actor, Method::PUT, "/me/tracks")
            .await?
            .json(&json!({ "ids": [track_id(track)] }));
        Self::send(request).await?;
        Ok(())
    }

    async fn remove_track(&self, actor: ActorId, track: &Track) -> Result<(), MusicApiError> {
        let request = self
            .user_request(actor, Method::DELETE, "/me/tracks")
            .await?
            .json(&json!({ "ids": [track_id(track)] }));
        Self::send(request).await?;
        Ok(())
    }

    async fn enqueue(&self, actor: ActorId, track: &Track) -> Result<(), MusicApiError> {
        let request = self
            .user_request(actor, Method::POST, "/me/player/queue")
            .await?
            .query(&[("uri", track.uri.as_str())])
            .header(CONTENT_LENGTH, 0);
        Self::send(request).await?;
        Ok(())
    }

    async fn play(&self, actor: ActorId, track: Option<&Track>) -> Result<(), MusicApiError> {
        let body = match track {
            Some(track) => json!({ "uris": [track.uri] }),
            None => json!({}),
        };
        let request = self
            .user_request(actor, Method::PUT, "/me/player/play")
            .await?
            .json(&body);
        Self::send(request).await?;
        Ok(())
    }

    async fn pause(&self, actor: ActorId) -> Result<(), MusicApiError> {
        self.player_command(actor, Method::PUT, "/me/player/pause")
            .await
    }

    async fn skip_next(&self, actor: ActorId) -> Result<(), MusicApiError> {
        self.player_command(actor, Method::POST, "/me/player/next")
            .await
    }

    async fn skip_previous(&self, actor: ActorId) -> Result<(), MusicApiError> {
        self.player_command(actor, Method::POST, "/me/player/previous")
            .await
    }
}
