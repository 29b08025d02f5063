//! Loosely-typed payloads returned by music providers and their validation into history records.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{OffsetDateTime, PrimitiveDateTime, macros::format_description};
use tracing::warn;

use crate::state::game::{PlayEvent, SaveEvent};

/// Artist entry of a provider track; only the name is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArtist {
    pub name: Option<String>,
}

/// Track object as returned by the provider, with every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrack {
    pub id: Option<String>,
    pub name: Option<String>,
    pub artists: Option<Vec<RawArtist>>,
}

/// Item of the listening history endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlayHistoryItem {
    pub track: Option<RawTrack>,
    pub played_at: Option<String>,
}

/// Item of the saved library endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSavedTrackItem {
    pub track: Option<RawTrack>,
    pub added_at: Option<String>,
}

/// Identity of the user who authorized the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: String,
    pub display_name: Option<String>,
}

/// Why a provider item was not accepted into the history store.
#[derive(Debug, Error)]
pub enum EntryRejection {
    #[error("item has no track")]
    MissingTrack,
    #[error("track has no id")]
    MissingTrackId,
    #[error("track has no name")]
    MissingTrackName,
    #[error("track has no named artist")]
    MissingArtist,
    #[error("item has no `{field}` timestamp")]
    MissingTimestamp { field: &'static str },
    #[error("unsupported `{field}` timestamp `{value}`")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: time::error::Parse,
    },
}

/// Parse a provider timestamp in UTC, with or without fractional seconds.
///
/// Accepted shapes are `2024-05-01T10:00:00Z` and `2024-05-01T10:00:00.123Z` (1 to 9 digits).
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let whole = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
    let fractional =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]Z");

    PrimitiveDateTime::parse(value, whole)
        .or_else(|_| PrimitiveDateTime::parse(value, fractional))
        .map(PrimitiveDateTime::assume_utc)
}

/// Validated track fields shared by plays and saves.
struct TrackFields {
    id: Option<String>,
    name: String,
    artist: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn track_fields(track: Option<RawTrack>) -> Result<TrackFields, EntryRejection> {
    let track = track.ok_or(EntryRejection::MissingTrack)?;
    let name = non_empty(track.name).ok_or(EntryRejection::MissingTrackName)?;
    let artist = track
        .artists
        .and_then(|artists| artists.into_iter().next())
        .and_then(|artist| non_empty(artist.name))
        .ok_or(EntryRejection::MissingArtist)?;

    Ok(TrackFields {
        id: non_empty(track.id),
        name,
        artist,
    })
}

fn timestamp(field: &'static str, value: Option<String>) -> Result<OffsetDateTime, EntryRejection> {
    let value = value.ok_or(EntryRejection::MissingTimestamp { field })?;
    parse_timestamp(&value).map_err(|source| EntryRejection::InvalidTimestamp {
        field,
        value,
        source,
    })
}

impl TryFrom<RawPlayHistoryItem> for PlayEvent {
    type Error = EntryRejection;

    fn try_from(item: RawPlayHistoryItem) -> Result<Self, Self::Error> {
        let track = track_fields(item.track)?;
        let played_at = timestamp("played_at", item.played_at)?;
        Ok(PlayEvent {
            track_id: track.id,
            track_name: track.name,
            artist_name: track.artist,
            played_at,
        })
    }
}

impl TryFrom<RawSavedTrackItem> for SaveEvent {
    type Error = EntryRejection;

    fn try_from(item: RawSavedTrackItem) -> Result<Self, Self::Error> {
        let track = track_fields(item.track)?;
        let track_id = track.id.ok_or(EntryRejection::MissingTrackId)?;
        let added_at = timestamp("added_at", item.added_at)?;
        Ok(SaveEvent {
            track_id,
            track_name: track.name,
            artist_name: track.artist,
            added_at,
        })
    }
}

/// Outcome of validating one batch of provider items.
#[derive(Debug)]
pub struct Ingested<T> {
    pub accepted: Vec<T>,
    pub rejected: usize,
}

/// Validate every item of `items`, skipping and logging the ones that cannot become `T`.
pub fn ingest<R, T>(participant: &str, kind: &'static str, items: Vec<R>) -> Ingested<T>
where
    T: TryFrom<R, Error = EntryRejection>,
{
    let mut accepted = Vec::with_capacity(items.len());
    let mut rejected = 0;

    for (index, item) in items.into_iter().enumerate() {
        match T::try_from(item) {
            Ok(entry) => accepted.push(entry),
            Err(err) => {
                rejected += 1;
                warn!(
                    participant,
                    kind,
                    index,
                    error = %err,
                    "skipping incomplete history entry"
                );
            }
        }
    }

    Ingested { accepted, rejected }
}
