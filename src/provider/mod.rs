/// Error types shared by provider implementations.
pub mod error;
/// Raw provider payloads and their validation into history records.
pub mod models;
/// Spotify Web API implementation.
pub mod spotify;

use std::fmt;

use futures::future::BoxFuture;

use crate::provider::{
    error::ProviderResult,
    models::{ProviderProfile, RawPlayHistoryItem, RawSavedTrackItem},
};

/// Bearer token obtained from the provider's authorization flow.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value for authorization headers.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Abstraction over the music service supplying identities and listening history.
///
/// Implementations return raw items untouched; validation happens at ingestion.
pub trait MusicProvider: Send + Sync {
    /// URL the user is redirected to in order to grant access, carrying `state` for the callback.
    fn authorize_url(&self, state: &str) -> ProviderResult<String>;
    /// Redeem an authorization code for an access token.
    fn exchange_code(&self, code: String) -> BoxFuture<'static, ProviderResult<AccessToken>>;
    /// Identity of the user owning `token`.
    fn fetch_profile(&self, token: AccessToken) -> BoxFuture<'static, ProviderResult<ProviderProfile>>;
    /// Most recent plays, at most `limit` items.
    fn fetch_listening_history(
        &self,
        token: AccessToken,
        limit: usize,
    ) -> BoxFuture<'static, ProviderResult<Vec<RawPlayHistoryItem>>>;
    /// Saved library, paginated up to `limit` items.
    fn fetch_saved_library(
        &self,
        token: AccessToken,
        limit: usize,
    ) -> BoxFuture<'static, ProviderResult<Vec<RawSavedTrackItem>>>;
}
