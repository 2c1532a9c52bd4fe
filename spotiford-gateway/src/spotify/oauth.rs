//! Authorization-code and client-credentials flows against the accounts service.

use reqwest::StatusCode;
use url::Url;

use super::MusicApiError;
use super::models::{OAuthErrorBody, TokenResponse};

/// Spotify application credentials and OAuth parameters.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    /// Build the URL a user opens to grant access.
    pub(super) fn authorize_url(&self, accounts_base: &str) -> String {
        let base = format!("{}/authorize", accounts_base.trim_end_matches('/'));
        match Url::parse_with_params(
            &base,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scopes.join(" ").as_str()),
            ],
        ) {
            Ok(url) => url.to_string(),
            Err(_) => base,
        }
    }

    pub(super) async fn exchange_code(
        &self,
        http: &reqwest::Client,
        accounts_base: &str,
        code: &str,
    ) -> Result<TokenResponse, MusicApiError> {
        self.token_request(
            http,
            accounts_base,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ],
        )
        .await
    }

    pub(super) async fn refresh(
        &self,
        http: &reqwest::Client,
        accounts_base: &str,
        refresh_token: &str,
    ) -> Result<TokenResponse, MusicApiError> {
        self.token_request(
            http,
            accounts_base,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
        )
        .await
    }

    pub(super) async fn client_credentials(
        &self,
        http: &reqwest::Client,
        accounts_base: &str,
    ) -> Result<TokenResponse, MusicApiError> {
        self.token_request(http, accounts_base, &[("grant_type", "client_credentials")])
            .await
    }

    async fn token_request(
        &self,
        http: &reqwest::Client,
        accounts_base: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, MusicApiError> {
        let response = http
            .post(format!("{}/api/token", accounts_base.trim_end_matches('/')))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<TokenResponse>()
                .await
                .map_err(|e| MusicApiError::InvalidResponse(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<OAuthErrorBody>(&body) {
            Ok(err) if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED => {
                Err(MusicApiError::Auth(match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                }))
            }
            _ => Err(MusicApiError::Api {
                status: status.as_u16(),
                message: body,
            }),
        }
    }
}

/// Extract the `code` query parameter from the page a user was redirected to.
///
/// Discord users often wrap links in `<...>` to suppress embeds, so the
/// brackets are stripped first.
pub fn parse_redirect_code(input: &str) -> Option<String> {
    let trimmed = input.trim().trim_start_matches('<').trim_end_matches('>');
    let url = Url::parse(trimmed).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
}
