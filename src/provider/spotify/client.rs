use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::provider::{
    AccessToken, MusicProvider,
    error::ProviderResult,
    models::{ProviderProfile, RawPlayHistoryItem, RawSavedTrackItem},
};

use super::{
    config::{SCOPES, SpotifyConfig},
    error::{SpotifyError, SpotifyResult},
    models::{PAGE_LIMIT, ProfileResponse, RecentlyPlayedPage, SavedTracksPage, TokenResponse},
};

const RECENTLY_PLAYED_PATH: &str = "me/player/recently-played";
const SAVED_TRACKS_PATH: &str = "me/tracks";
const PROFILE_PATH: &str = "me";

/// [`MusicProvider`] backed by the Spotify Web API.
#[derive(Clone)]
pub struct SpotifyProvider {
    client: Client,
    config: Arc<SpotifyConfig>,
}

impl SpotifyProvider {
    /// Build the HTTP client used for every Spotify call.
    pub fn new(config: SpotifyConfig) -> SpotifyResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| SpotifyError::ClientBuilder { source })?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn get_json<T>(
        &self,
        token: &AccessToken,
        path: &str,
        query: &[(&str, String)],
    ) -> SpotifyResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(self.api_url(path))
            .bearer_auth(token.secret())
            .query(query)
            .send()
            .await
            .map_err(|source| SpotifyError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(SpotifyError::RequestStatus {
                path: path.to_string(),
                status: response.status(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| SpotifyError::DecodeResponse {
                path: path.to_string(),
                source,
            })
    }

    async fn request_token(&self, code: &str) -> SpotifyResult<AccessToken> {
        let path = format!("{}/api/token", self.config.accounts_url.trim_end_matches('/'));
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(&path)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&form)
            .send()
            .await
            .map_err(|source| SpotifyError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(SpotifyError::RequestStatus {
                path,
                status: response.status(),
            });
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|source| SpotifyError::DecodeResponse { path, source })?;
        Ok(AccessToken::new(token.access_token))
    }

    async fn saved_tracks(
        &self,
        token: &AccessToken,
        limit: usize,
    ) -> SpotifyResult<Vec<RawSavedTrackItem>> {
        let mut collected = Vec::new();
        let mut offset = 0;

        while collected.len() < limit {
            let page_size = PAGE_LIMIT.min(limit - collected.len());
            let page: SavedTracksPage = self
                .get_json(
                    token,
                    SAVED_TRACKS_PATH,
                    &[
                        ("limit", page_size.to_string()),
                        ("offset", offset.to_string()),
                    ],
                )
                .await?;

            let received = page.items.len();
            debug!(offset, received, "fetched saved tracks page");
            let remaining = limit - collected.len();
            collected.extend(
                page.into_items(SAVED_TRACKS_PATH)
                    .into_iter()
                    .take(remaining),
            );
            offset += received;

            if received < page_size {
                break;
            }
        }

        Ok(collected)
    }
}

impl MusicProvider for SpotifyProvider {
    fn authorize_url(&self, state: &str) -> ProviderResult<String> {
        let base = format!("{}/authorize", self.config.accounts_url.trim_end_matches('/'));
        let url = Url::parse_with_params(
            &base,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", SCOPES),
                ("state", state),
                ("show_dialog", "true"),
            ],
        )
        .map_err(|err| SpotifyError::AuthorizeUrl {
            url: base.clone(),
            reason: err.to_string(),
        })?;

        Ok(url.into())
    }

    fn exchange_code(&self, code: String) -> BoxFuture<'static, ProviderResult<AccessToken>> {
        let provider = self.clone();
        Box::pin(async move { provider.request_token(&code).await.map_err(Into::into) })
    }

    fn fetch_profile(
        &self,
        token: AccessToken,
    ) -> BoxFuture<'static, ProviderResult<ProviderProfile>> {
        let provider = self.clone();
        Box::pin(async move {
            let profile: ProfileResponse = provider.get_json(&token, PROFILE_PATH, &[]).await?;
            Ok(profile.into())
        })
    }

    fn fetch_listening_history(
        &self,
        token: AccessToken,
        limit: usize,
    ) -> BoxFuture<'static, ProviderResult<Vec<RawPlayHistoryItem>>> {
        let provider = self.clone();
        let limit = limit.clamp(1, PAGE_LIMIT);
        Box::pin(async move {
            let page: RecentlyPlayedPage = provider
                .get_json(&token, RECENTLY_PLAYED_PATH, &[("limit", limit.to_string())])
                .await?;
            Ok(page.into_items(RECENTLY_PLAYED_PATH))
        })
    }

    fn fetch_saved_library(
        &self,
        token: AccessToken,
        limit: usize,
    ) -> BoxFuture<'static, ProviderResult<Vec<RawSavedTrackItem>>> {
        let provider = self.clone();
        Box::pin(async move {
            provider
                .saved_tracks(&token, limit)
                .await
                .map_err(Into::into)
        })
    }
}
