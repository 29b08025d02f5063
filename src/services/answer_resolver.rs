//! Resolves who most recently played or saved a chosen song.

use time::OffsetDateTime;
use tracing::debug;

use crate::state::{
    game::{HistoryEntry, ParticipantRecord, SongKey},
    history::HistorySnapshot,
};

/// Participant whose event is the most recent one matching the chosen song.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedAnswer<'a> {
    pub participant: &'a ParticipantRecord,
    pub occurred_at: OffsetDateTime,
    /// Number of eligible entries across all participants matching the song key.
    pub qualifying: usize,
}

/// Find the most recent eligible entry matching `key` across every participant of `snapshot`.
///
/// Entries are scanned in snapshot order, then in each participant's list order. Only a strictly
/// later timestamp replaces the current best, so among entries sharing the maximal timestamp the
/// first one scanned wins. Returns `None` when the qualifying set is empty.
pub fn resolve_answer<'a, E, F>(
    snapshot: &'a HistorySnapshot,
    key: &SongKey,
    events: F,
) -> Option<ResolvedAnswer<'a>>
where
    E: HistoryEntry,
    F: Fn(&ParticipantRecord) -> &[E],
{
    let mut best: Option<ResolvedAnswer<'a>> = None;
    let mut qualifying = 0;

    for participant in snapshot.iter() {
        for entry in events(participant) {
            if !entry.is_eligible() || !key.matches(entry) {
                continue;
            }
            qualifying += 1;

            let occurred_at = entry.occurred_at();
            let is_later = best
                .as_ref()
                .is_none_or(|current| occurred_at > current.occurred_at);
            if is_later {
                best = Some(ResolvedAnswer {
                    participant,
                    occurred_at,
                    qualifying: 0,
                });
            }
        }
    }

    debug!(song = %key, qualifying, "resolved qualifying set");
    best.map(|answer| ResolvedAnswer {
        qualifying,
        ..answer
    })
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use super::*;
    use crate::state::game::{PlayEvent, SaveEvent};

    fn at(minute: i64) -> OffsetDateTime {
        datetime!(2024-05-01 10:00 UTC) + Duration::minutes(minute)
    }

    fn play(id: Option<&str>, name: &str, minute: i64) -> PlayEvent {
        PlayEvent {
            track_id: id.map(str::to_string),
            track_name: name.into(),
            artist_name: "Band".into(),
            played_at: at(minute),
        }
    }

    fn save(id: &str, minute: i64) -> SaveEvent {
        SaveEvent {
            track_id: id.into(),
            track_name: format!("Song {id}"),
            artist_name: "Band".into(),
            added_at: at(minute),
        }
    }

    fn participant(id: &str, timeline: Vec<PlayEvent>, saves: Vec<SaveEvent>) -> ParticipantRecord {
        ParticipantRecord::new(id.into(), Some(id.to_uppercase()), timeline, saves)
    }

    #[test]
    fn most_recent_play_wins_regardless_of_list_order() {
        let snapshot = HistorySnapshot::from_records([
            participant("a", vec![play(Some("t1"), "Song", 30)], vec![]),
            participant(
                "b",
                vec![play(Some("t1"), "Song", 5), play(Some("t1"), "Song", 45)],
                vec![],
            ),
            participant("c", vec![play(Some("t2"), "Other", 90)], vec![]),
        ]);

        let answer = resolve_answer(
            &snapshot,
            &SongKey::Id("t1".into()),
            ParticipantRecord::timeline,
        )
        .unwrap();
        assert_eq!(answer.participant.display_name, "B");
        assert_eq!(answer.occurred_at, at(45));
        assert_eq!(answer.qualifying, 3);
    }

    #[test]
    fn saved_tracks_resolve_by_added_at() {
        let snapshot = HistorySnapshot::from_records([
            participant("a", vec![], vec![save("t1", 100)]),
            participant("b", vec![], vec![save("t1", 10)]),
        ]);

        let answer = resolve_answer(
            &snapshot,
            &SongKey::Id("t1".into()),
            ParticipantRecord::saved_tracks,
        )
        .unwrap();
        assert_eq!(answer.participant.id, "a");
        assert_eq!(answer.qualifying, 2);
    }

    #[test]
    fn id_less_song_matches_on_name_and_artist() {
        let snapshot = HistorySnapshot::from_records([
            participant("a", vec![play(None, "Local File", 1)], vec![]),
            participant("b", vec![play(None, "Local File", 2)], vec![]),
            participant("c", vec![play(None, "Another File", 3)], vec![]),
        ]);

        let key = play(None, "Local File", 0).song_key();
        let answer = resolve_answer(&snapshot, &key, ParticipantRecord::timeline).unwrap();
        assert_eq!(answer.participant.id, "b");
        assert_eq!(answer.qualifying, 2);
    }

    #[test]
    fn tie_goes_to_first_participant_in_snapshot_order() {
        let snapshot = HistorySnapshot::from_records([
            participant("a", vec![play(Some("t1"), "Song", 10)], vec![]),
            participant("b", vec![play(Some("t1"), "Song", 10)], vec![]),
        ]);
        let key = SongKey::Id("t1".into());

        let first = resolve_answer(&snapshot, &key, ParticipantRecord::timeline).unwrap();
        let second = resolve_answer(&snapshot, &key, ParticipantRecord::timeline).unwrap();
        assert_eq!(first.participant.id, "a");
        assert_eq!(second.participant.id, first.participant.id);
    }

    #[test]
    fn ineligible_entries_do_not_qualify() {
        let mut broken = play(Some("t1"), "Song", 99);
        broken.artist_name.clear();
        let snapshot = HistorySnapshot::from_records([
            participant("a", vec![broken], vec![]),
            participant("b", vec![play(Some("t1"), "Song", 1)], vec![]),
        ]);

        let answer = resolve_answer(
            &snapshot,
            &SongKey::Id("t1".into()),
            ParticipantRecord::timeline,
        )
        .unwrap();
        assert_eq!(answer.participant.id, "b");
        assert_eq!(answer.qualifying, 1);
    }

    #[test]
    fn unknown_song_is_unresolved() {
        let snapshot = HistorySnapshot::from_records([participant(
            "a",
            vec![play(Some("t1"), "Song", 1)],
            vec![],
        )]);

        assert!(
            resolve_answer(
                &snapshot,
                &SongKey::Id("missing".into()),
                ParticipantRecord::timeline
            )
            .is_none()
        );
    }
}
