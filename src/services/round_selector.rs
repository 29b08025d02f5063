//! Question strategy selection and the fallback pipeline that turns a history snapshot into a round.

use std::fmt;

use rand::Rng;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::{
    services::{
        answer_resolver::resolve_answer,
        song_picker::{PickError, Selection, pick_song},
    },
    state::{
        game::{ChosenSong, HistoryEntry, ParticipantRecord},
        history::HistorySnapshot,
    },
};

/// Kind of question asked in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStrategy {
    /// "Who has most recently listened to this song?"
    RecentListener,
    /// "Who most recently added this song to their saved tracks?"
    SavedTrack,
}

impl QuestionStrategy {
    /// Strategy attempted first for `round_number`: saved tracks on even rounds, plays on odd ones.
    pub fn preferred_for(round_number: u64) -> Self {
        if round_number % 2 == 0 {
            QuestionStrategy::SavedTrack
        } else {
            QuestionStrategy::RecentListener
        }
    }

    /// The strategy used when this one cannot produce a question.
    pub fn other(self) -> Self {
        match self {
            QuestionStrategy::RecentListener => QuestionStrategy::SavedTrack,
            QuestionStrategy::SavedTrack => QuestionStrategy::RecentListener,
        }
    }

    /// Wire name surfaced as `question_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionStrategy::RecentListener => "recent_listener",
            QuestionStrategy::SavedTrack => "saved_track",
        }
    }

    /// Question shown above the song.
    pub fn question_text(self) -> &'static str {
        match self {
            QuestionStrategy::RecentListener => "Who has most recently listened to:",
            QuestionStrategy::SavedTrack => {
                "Who most recently added this song to their saved tracks?"
            }
        }
    }

    fn activity(self) -> &'static str {
        match self {
            QuestionStrategy::RecentListener => "played",
            QuestionStrategy::SavedTrack => "saved",
        }
    }
}

impl fmt::Display for QuestionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionStrategy::RecentListener => f.write_str("recent listener"),
            QuestionStrategy::SavedTrack => f.write_str("saved track"),
        }
    }
}

/// Correct answer of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The participant owning the most recent qualifying event.
    Resolved {
        participant_id: String,
        display_name: String,
        occurred_at: OffsetDateTime,
    },
    /// A song was chosen but no qualifying event names an answer.
    Unresolved,
}

/// A generated question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub strategy: QuestionStrategy,
    pub song: ChosenSong,
    pub answer: Answer,
    /// Display names of every participant, in snapshot order.
    pub options: Vec<String>,
}

/// Why a strategy could not produce a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsufficientReason {
    /// No participant has any entry of the kind the strategy needs.
    NoHistory,
    /// Entries exist but none passes validation.
    NoEligibleEntries,
    /// A song was chosen but no qualifying event could be found for it.
    AnswerUnresolved(ChosenSong),
}

impl fmt::Display for InsufficientReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsufficientReason::NoHistory => f.write_str("no player has any history of this kind"),
            InsufficientReason::NoEligibleEntries => {
                f.write_str("every available entry has incomplete data")
            }
            InsufficientReason::AnswerUnresolved(song) => {
                write!(f, "could not determine an answer for '{}'", song.track_name)
            }
        }
    }
}

/// Result of attempting a single strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Question(Round),
    Insufficient(InsufficientReason),
}

/// Result of a whole round once the fallback pipeline has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    Question(Round),
    /// Neither strategy could produce a question.
    NoDataAvailable,
}

/// A round outcome with the user-facing notices gathered while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub round_number: u64,
    pub outcome: RoundOutcome,
    pub notices: Vec<String>,
}

/// Generate the question for `round_number` from `snapshot`.
///
/// The preferred strategy is attempted first and the other one second. The last attempt accepts an
/// unresolved answer so a picked song is still shown; earlier attempts fall through instead.
pub fn generate_round<R>(snapshot: &HistorySnapshot, round_number: u64, rng: &mut R) -> RoundReport
where
    R: Rng + ?Sized,
{
    let preferred = QuestionStrategy::preferred_for(round_number);
    let pipeline = [preferred, preferred.other()];
    let mut notices = Vec::new();

    for (index, strategy) in pipeline.iter().copied().enumerate() {
        let is_last = index + 1 == pipeline.len();
        match attempt_strategy(strategy, snapshot, rng, is_last, &mut notices) {
            StrategyOutcome::Question(round) => {
                info!(
                    round_number,
                    question_type = strategy.as_str(),
                    song = %round.song.key(),
                    "generated round"
                );
                return RoundReport {
                    round_number,
                    outcome: RoundOutcome::Question(round),
                    notices,
                };
            }
            StrategyOutcome::Insufficient(reason) => {
                debug!(round_number, %strategy, %reason, "strategy could not produce a question");
                let mut notice = format!("Cannot ask a {strategy} question: {reason}.");
                if !is_last {
                    notice.push_str(&format!(" Asking a {} question instead.", strategy.other()));
                }
                notices.push(notice);
            }
        }
    }

    warn!(
        round_number,
        participants = snapshot.len(),
        "no game data available to ask a question"
    );
    notices.push("Unable to select any song. No game data available.".into());
    RoundReport {
        round_number,
        outcome: RoundOutcome::NoDataAvailable,
        notices,
    }
}

/// Attempt a single strategy against `snapshot`.
///
/// With `accept_unresolved`, a chosen song without qualifying events still yields a question whose
/// answer is [`Answer::Unresolved`].
pub fn attempt_strategy<R>(
    strategy: QuestionStrategy,
    snapshot: &HistorySnapshot,
    rng: &mut R,
    accept_unresolved: bool,
    notices: &mut Vec<String>,
) -> StrategyOutcome
where
    R: Rng + ?Sized,
{
    match strategy {
        QuestionStrategy::RecentListener => attempt_with(
            strategy,
            snapshot,
            ParticipantRecord::timeline,
            rng,
            accept_unresolved,
            notices,
        ),
        QuestionStrategy::SavedTrack => attempt_with(
            strategy,
            snapshot,
            ParticipantRecord::saved_tracks,
            rng,
            accept_unresolved,
            notices,
        ),
    }
}

fn attempt_with<E, F, R>(
    strategy: QuestionStrategy,
    snapshot: &HistorySnapshot,
    events: F,
    rng: &mut R,
    accept_unresolved: bool,
    notices: &mut Vec<String>,
) -> StrategyOutcome
where
    E: HistoryEntry,
    F: Fn(&ParticipantRecord) -> &[E],
    R: Rng + ?Sized,
{
    let picked = match pick_song(snapshot, &events, rng) {
        Ok(picked) => picked,
        Err(PickError::NoHistory) => {
            return StrategyOutcome::Insufficient(InsufficientReason::NoHistory);
        }
        Err(PickError::NoEligibleEntries) => {
            return StrategyOutcome::Insufficient(InsufficientReason::NoEligibleEntries);
        }
    };

    if picked.selection == Selection::GlobalPool {
        notices.push(format!(
            "Fair song selection from {strategy} data failed. Picked globally."
        ));
    }

    let song = ChosenSong::from_entry(picked.entry);
    complete_round(strategy, snapshot, song, &events, accept_unresolved, notices)
}

/// Resolve the answer for an already chosen song and assemble the round.
fn complete_round<E, F>(
    strategy: QuestionStrategy,
    snapshot: &HistorySnapshot,
    song: ChosenSong,
    events: F,
    accept_unresolved: bool,
    notices: &mut Vec<String>,
) -> StrategyOutcome
where
    E: HistoryEntry,
    F: Fn(&ParticipantRecord) -> &[E],
{
    let answer = match resolve_answer(snapshot, &song.key(), events) {
        Some(resolved) => Answer::Resolved {
            participant_id: resolved.participant.id.clone(),
            display_name: resolved.participant.display_name.clone(),
            occurred_at: resolved.occurred_at,
        },
        None if accept_unresolved => {
            warn!(song = %song.key(), %strategy, "no qualifying event found for chosen song");
            notices.push(format!(
                "Could not determine who most recently {} '{}'.",
                strategy.activity(),
                song.track_name
            ));
            Answer::Unresolved
        }
        None => {
            return StrategyOutcome::Insufficient(InsufficientReason::AnswerUnresolved(song));
        }
    };

    StrategyOutcome::Question(Round {
        strategy,
        song,
        answer,
        options: snapshot.display_names(),
    })
}
