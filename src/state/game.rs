use std::fmt;

use time::OffsetDateTime;
use uuid::Uuid;

/// Participant joined through the music provider, with the history used as question material.
#[derive(Debug, Clone)]
pub struct ParticipantRecord {
    /// Stable identifier assigned by the provider (unique within the history store).
    pub id: String,
    /// Name shown as an answer option.
    pub display_name: String,
    /// Recently played tracks in provider return order (not guaranteed chronological).
    pub timeline: Vec<PlayEvent>,
    /// Library saves in provider return order (not guaranteed chronological).
    pub saved_tracks: Vec<SaveEvent>,
}

impl ParticipantRecord {
    /// Build a record, falling back to the provider id when no display name is set.
    pub fn new(
        id: String,
        display_name: Option<String>,
        timeline: Vec<PlayEvent>,
        saved_tracks: Vec<SaveEvent>,
    ) -> Self {
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| id.clone());
        Self {
            id,
            display_name,
            timeline,
            saved_tracks,
        }
    }

    /// Listening history accessor, usable as a strategy event source.
    pub fn timeline(&self) -> &[PlayEvent] {
        &self.timeline
    }

    /// Saved library accessor, usable as a strategy event source.
    pub fn saved_tracks(&self) -> &[SaveEvent] {
        &self.saved_tracks
    }
}

/// A single play from the listening history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayEvent {
    /// Provider track id; some plays (local files, podcasts) come without one.
    pub track_id: Option<String>,
    pub track_name: String,
    /// First listed artist only.
    pub artist_name: String,
    pub played_at: OffsetDateTime,
}

/// A single track saved to the participant's library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEvent {
    pub track_id: String,
    pub track_name: String,
    /// First listed artist only.
    pub artist_name: String,
    pub added_at: OffsetDateTime,
}

/// Common view over play and save events used by song selection and answer resolution.
pub trait HistoryEntry {
    /// Provider track id, when known.
    fn track_id(&self) -> Option<&str>;
    /// Track title.
    fn track_name(&self) -> &str;
    /// First listed artist.
    fn artist_name(&self) -> &str;
    /// Instant the event happened (play or save time).
    fn occurred_at(&self) -> OffsetDateTime;

    /// Whether the entry carries everything needed to ask and answer a question.
    fn is_eligible(&self) -> bool {
        !self.track_name().trim().is_empty() && !self.artist_name().trim().is_empty()
    }

    /// Identity used to match this entry against a chosen song.
    fn song_key(&self) -> SongKey {
        match self.track_id() {
            Some(id) if !id.is_empty() => SongKey::Id(id.to_string()),
            _ => SongKey::NameArtist {
                track_name: self.track_name().to_string(),
                artist_name: self.artist_name().to_string(),
            },
        }
    }
}

impl HistoryEntry for PlayEvent {
    fn track_id(&self) -> Option<&str> {
        self.track_id.as_deref()
    }

    fn track_name(&self) -> &str {
        &self.track_name
    }

    fn artist_name(&self) -> &str {
        &self.artist_name
    }

    fn occurred_at(&self) -> OffsetDateTime {
        self.played_at
    }
}

impl HistoryEntry for SaveEvent {
    fn track_id(&self) -> Option<&str> {
        Some(&self.track_id)
    }

    fn track_name(&self) -> &str {
        &self.track_name
    }

    fn artist_name(&self) -> &str {
        &self.artist_name
    }

    fn occurred_at(&self) -> OffsetDateTime {
        self.added_at
    }

    // Library saves are always keyed by id.
    fn is_eligible(&self) -> bool {
        !self.track_id.trim().is_empty()
            && !self.track_name.trim().is_empty()
            && !self.artist_name.trim().is_empty()
    }
}

/// Identifying key of a song: the provider id when present, else the exact title/artist pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SongKey {
    /// Provider track id.
    Id(String),
    /// Exact title and first-artist pair for id-less entries.
    NameArtist {
        track_name: String,
        artist_name: String,
    },
}

impl SongKey {
    /// Whether `entry` refers to the song identified by this key.
    ///
    /// Id keys only match entries carrying the same id. Name/artist keys match on the exact pair,
    /// whether or not the candidate entry has an id of its own.
    pub fn matches<E: HistoryEntry + ?Sized>(&self, entry: &E) -> bool {
        match self {
            SongKey::Id(id) => entry.track_id() == Some(id.as_str()),
            SongKey::NameArtist {
                track_name,
                artist_name,
            } => entry.track_name() == track_name && entry.artist_name() == artist_name,
        }
    }
}

impl fmt::Display for SongKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SongKey::Id(id) => write!(f, "track `{id}`"),
            SongKey::NameArtist {
                track_name,
                artist_name,
            } => write!(f, "`{track_name}` by `{artist_name}`"),
        }
    }
}

/// Song chosen as the subject of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChosenSong {
    pub track_id: Option<String>,
    pub track_name: String,
    pub artist_name: String,
}

impl ChosenSong {
    /// Capture the song details of a history entry.
    pub fn from_entry<E: HistoryEntry + ?Sized>(entry: &E) -> Self {
        Self {
            track_id: entry.track_id().map(str::to_string),
            track_name: entry.track_name().to_string(),
            artist_name: entry.artist_name().to_string(),
        }
    }

    /// Key used to look the song up in every participant's history.
    pub fn key(&self) -> SongKey {
        match &self.track_id {
            Some(id) if !id.is_empty() => SongKey::Id(id.clone()),
            _ => SongKey::NameArtist {
                track_name: self.track_name.clone(),
                artist_name: self.artist_name.clone(),
            },
        }
    }
}

/// Per-game session carrying the round counter whose parity picks the preferred strategy.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Identifier handed to the client that drives the game.
    pub id: Uuid,
    /// Creation time, exposed for display.
    pub created_at: OffsetDateTime,
    /// Number of rounds generated so far; the next round uses `round_number + 1`.
    pub round_number: u64,
}

impl GameSession {
    /// Build a fresh session that has not generated any round yet.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            round_number: 0,
        }
    }

    /// Advance the counter and return the number of the round about to be generated.
    pub fn next_round(&mut self) -> u64 {
        self.round_number += 1;
        self.round_number
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn play(id: Option<&str>, name: &str, artist: &str) -> PlayEvent {
        PlayEvent {
            track_id: id.map(str::to_string),
            track_name: name.into(),
            artist_name: artist.into(),
            played_at: datetime!(2024-05-01 10:00 UTC),
        }
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let record = ParticipantRecord::new("user-1".into(), None, vec![], vec![]);
        assert_eq!(record.display_name, "user-1");

        let record = ParticipantRecord::new("user-2".into(), Some("  ".into()), vec![], vec![]);
        assert_eq!(record.display_name, "user-2");

        let record = ParticipantRecord::new("user-3".into(), Some("Ada".into()), vec![], vec![]);
        assert_eq!(record.display_name, "Ada");
    }

    #[test]
    fn song_key_prefers_track_id() {
        assert_eq!(
            play(Some("abc"), "Song", "Band").song_key(),
            SongKey::Id("abc".into())
        );
        assert_eq!(
            play(None, "Song", "Band").song_key(),
            SongKey::NameArtist {
                track_name: "Song".into(),
                artist_name: "Band".into()
            }
        );
    }

    #[test]
    fn id_less_key_matches_on_name_and_artist() {
        let key = play(None, "Song", "Band").song_key();
        assert!(key.matches(&play(None, "Song", "Band")));
        assert!(key.matches(&play(Some("abc"), "Song", "Band")));
        assert!(!key.matches(&play(None, "Song", "Other Band")));
    }

    #[test]
    fn id_key_ignores_same_named_entries_without_id() {
        let key = SongKey::Id("abc".into());
        assert!(key.matches(&play(Some("abc"), "Renamed", "Band")));
        assert!(!key.matches(&play(None, "Song", "Band")));
    }

    #[test]
    fn save_event_requires_track_id() {
        let save = SaveEvent {
            track_id: String::new(),
            track_name: "Song".into(),
            artist_name: "Band".into(),
            added_at: datetime!(2024-05-01 10:00 UTC),
        };
        assert!(!save.is_eligible());
        assert!(play(None, "Song", "Band").is_eligible());
        assert!(!play(None, "Song", " ").is_eligible());
    }

    #[test]
    fn session_counter_is_monotonic() {
        let mut session = GameSession::new();
        assert_eq!(session.next_round(), 1);
        assert_eq!(session.next_round(), 2);
        assert_eq!(session.round_number, 2);
    }
}
