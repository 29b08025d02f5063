//! Fair song selection over the participants of a history snapshot.
//!
//! Participants are sampled first and entries second, so a participant with a huge library
//! weighs the same as one with a handful of saves.

use rand::{Rng, seq::IndexedRandom};
use thiserror::Error;
use tracing::{debug, warn};

use crate::state::{
    game::{HistoryEntry, ParticipantRecord},
    history::HistorySnapshot,
};

/// How the returned entry was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Uniform participant first, then uniform entry from that participant.
    PerParticipant,
    /// Uniform entry from the flattened pool of every eligible entry.
    GlobalPool,
}

/// Entry picked as question material, with its owner.
#[derive(Debug)]
pub struct PickedSong<'a, E> {
    pub owner: &'a ParticipantRecord,
    pub entry: &'a E,
    pub selection: Selection,
}

/// Reasons no song can be picked for a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PickError {
    /// No participant contributes any entry of the requested kind.
    #[error("no participant has any entries")]
    NoHistory,
    /// Entries exist but none of them is eligible.
    #[error("no eligible entry is available")]
    NoEligibleEntries,
}

/// Pick one entry from `snapshot` using `events` to select the relevant list of each participant.
///
/// A participant owning at least one eligible entry is drawn uniformly, then one of their eligible
/// entries is drawn uniformly. Incomplete entries never make their owner a candidate. When no
/// participant qualifies, selection falls back to a uniform draw over the flattened pool of
/// eligible entries.
pub fn pick_song<'a, E, F, R>(
    snapshot: &'a HistorySnapshot,
    events: F,
    rng: &mut R,
) -> Result<PickedSong<'a, E>, PickError>
where
    E: HistoryEntry,
    F: Fn(&ParticipantRecord) -> &[E],
    R: Rng + ?Sized,
{
    let contributors = snapshot
        .iter()
        .filter(|record| events(*record).iter().any(HistoryEntry::is_eligible))
        .collect::<Vec<_>>();

    if let Some(owner) = contributors.choose(rng).copied() {
        let eligible = eligible_entries(events(owner));
        if let Some(entry) = eligible.choose(rng).copied() {
            return Ok(PickedSong {
                owner,
                entry,
                selection: Selection::PerParticipant,
            });
        }
    }

    let pool = snapshot
        .iter()
        .flat_map(|record| {
            eligible_entries(events(record))
                .into_iter()
                .map(move |entry| (record, entry))
        })
        .collect::<Vec<_>>();

    match pool.choose(rng) {
        Some(&(owner, entry)) => {
            warn!(pool = pool.len(), "no fair candidate; picked song from the global pool");
            Ok(PickedSong {
                owner,
                entry,
                selection: Selection::GlobalPool,
            })
        }
        None if snapshot.iter().all(|record| events(record).is_empty()) => {
            Err(PickError::NoHistory)
        }
        None => {
            debug!(participants = snapshot.len(), "every history entry is incomplete");
            Err(PickError::NoEligibleEntries)
        }
    }
}

fn eligible_entries<E: HistoryEntry>(entries: &[E]) -> Vec<&E> {
    entries.iter().filter(|entry| entry.is_eligible()).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{SeedableRng, rngs::StdRng};
    use time::{Duration, macros::datetime};

    use super::*;
    use crate::state::game::{PlayEvent, SaveEvent};

    fn play(id: &str, name: &str, artist: &str, minute: i64) -> PlayEvent {
        PlayEvent {
            track_id: Some(id.into()),
            track_name: name.into(),
            artist_name: artist.into(),
            played_at: datetime!(2024-05-01 10:00 UTC) + Duration::minutes(minute),
        }
    }

    fn save(id: &str, minute: i64) -> SaveEvent {
        SaveEvent {
            track_id: id.into(),
            track_name: format!("Song {id}"),
            artist_name: "Band".into(),
            added_at: datetime!(2024-05-01 10:00 UTC) + Duration::minutes(minute),
        }
    }

    fn participant(id: &str, timeline: Vec<PlayEvent>, saves: Vec<SaveEvent>) -> ParticipantRecord {
        ParticipantRecord::new(id.into(), Some(id.to_uppercase()), timeline, saves)
    }

    #[test]
    fn empty_snapshot_has_no_history() {
        let snapshot = HistorySnapshot::default();
        let mut rng = StdRng::seed_from_u64(1);
        let err = pick_song(&snapshot, ParticipantRecord::timeline, &mut rng).unwrap_err();
        assert_eq!(err, PickError::NoHistory);
    }

    #[test]
    fn participants_without_entries_of_the_kind_have_no_history() {
        let snapshot = HistorySnapshot::from_records([participant(
            "a",
            vec![play("t1", "Song", "Band", 0)],
            vec![],
        )]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = pick_song(&snapshot, ParticipantRecord::saved_tracks, &mut rng).unwrap_err();
        assert_eq!(err, PickError::NoHistory);
    }

    #[test]
    fn single_entry_is_always_picked() {
        let snapshot = HistorySnapshot::from_records([participant(
            "a",
            vec![play("t1", "Song", "Band", 0)],
            vec![],
        )]);
        let mut rng = StdRng::seed_from_u64(7);
        let picked = pick_song(&snapshot, ParticipantRecord::timeline, &mut rng).unwrap();
        assert_eq!(picked.owner.id, "a");
        assert_eq!(picked.entry.track_name, "Song");
        assert_eq!(picked.selection, Selection::PerParticipant);
    }

    #[test]
    fn participant_with_only_incomplete_entries_is_never_drawn() {
        let snapshot = HistorySnapshot::from_records([
            participant("a", vec![play("t1", "Broken", "", 0)], vec![]),
            participant("b", vec![play("t2", "Song", "Band", 1)], vec![]),
        ]);

        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = pick_song(&snapshot, ParticipantRecord::timeline, &mut rng).unwrap();
            assert_eq!(picked.owner.id, "b");
            assert_eq!(picked.entry.track_id.as_deref(), Some("t2"));
            assert_eq!(picked.selection, Selection::PerParticipant);
        }
    }

    #[test]
    fn incomplete_entries_of_a_candidate_are_skipped() {
        let mut broken = save("broken", 0);
        broken.track_name.clear();
        let snapshot = HistorySnapshot::from_records([participant(
            "a",
            vec![],
            vec![broken, save("ok", 1)],
        )]);

        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = pick_song(&snapshot, ParticipantRecord::saved_tracks, &mut rng).unwrap();
            assert_eq!(picked.entry.track_id, "ok");
        }
    }

    #[test]
    fn incomplete_participant_does_not_skew_fairness() {
        let mut broken = save("broken", 0);
        broken.track_name.clear();
        let big = (0..99).map(|i| save(&format!("big-{i}"), i)).collect();
        let snapshot = HistorySnapshot::from_records([
            participant("broken", vec![], vec![broken]),
            participant("small", vec![], vec![save("small-0", 0)]),
            participant("big", vec![], big),
        ]);

        let trials = 30_000;
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..trials {
            let picked = pick_song(&snapshot, ParticipantRecord::saved_tracks, &mut rng).unwrap();
            assert_eq!(picked.selection, Selection::PerParticipant);
            *counts.entry(picked.owner.id.clone()).or_default() += 1;
        }

        assert!(!counts.contains_key("broken"));
        let share = counts["small"] as f64 / trials as f64;
        assert!((share - 0.5).abs() < 0.02, "small picked with share {share}");
    }

    #[test]
    fn only_incomplete_entries_is_not_eligible() {
        let snapshot = HistorySnapshot::from_records([participant(
            "a",
            vec![play("t1", "", "Band", 0)],
            vec![],
        )]);
        let mut rng = StdRng::seed_from_u64(3);
        let err = pick_song(&snapshot, ParticipantRecord::timeline, &mut rng).unwrap_err();
        assert_eq!(err, PickError::NoEligibleEntries);
    }

    #[test]
    fn participants_are_weighted_equally_regardless_of_volume() {
        let big = (0..500).map(|i| save(&format!("big-{i}"), i)).collect();
        let small = (0..5).map(|i| save(&format!("small-{i}"), i)).collect();
        let medium = (0..50).map(|i| save(&format!("medium-{i}"), i)).collect();
        let snapshot = HistorySnapshot::from_records([
            participant("big", vec![], big),
            participant("small", vec![], small),
            participant("medium", vec![], medium),
        ]);

        let trials = 30_000;
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..trials {
            let picked = pick_song(&snapshot, ParticipantRecord::saved_tracks, &mut rng).unwrap();
            *counts.entry(picked.owner.id.clone()).or_default() += 1;
        }

        for id in ["big", "small", "medium"] {
            let share = counts[id] as f64 / trials as f64;
            assert!(
                (share - 1.0 / 3.0).abs() < 0.02,
                "participant {id} picked with share {share}"
            );
        }
    }
}
