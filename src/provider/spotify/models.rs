use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use crate::provider::models::{ProviderProfile, RawPlayHistoryItem, RawSavedTrackItem};

/// Maximum page size accepted by the Spotify history and library endpoints.
pub const PAGE_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl From<ProfileResponse> for ProviderProfile {
    fn from(value: ProfileResponse) -> Self {
        Self {
            id: value.id,
            display_name: value.display_name,
        }
    }
}

/// Page envelope shared by the paginated endpoints.
///
/// Items stay as raw JSON so one malformed item cannot fail the whole page.
#[derive(Debug, Deserialize)]
#[serde(bound = "")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<Value>,
    #[serde(skip)]
    item: std::marker::PhantomData<T>,
}

impl<T> Page<T>
where
    T: DeserializeOwned + Default,
{
    /// Decode every item, replacing the ones with an unexpected shape by an empty item that
    /// ingestion then rejects.
    pub fn into_items(self, path: &str) -> Vec<T> {
        self.items
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value(value).unwrap_or_else(|err| {
                    warn!(path, index, error = %err, "malformed Spotify item");
                    T::default()
                })
            })
            .collect()
    }
}

pub type RecentlyPlayedPage = Page<RawPlayHistoryItem>;
pub type SavedTracksPage = Page<RawSavedTrackItem>;
