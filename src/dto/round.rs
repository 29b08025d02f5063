use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::format_timestamp,
    services::round_selector::{Answer, QuestionStrategy, Round, RoundOutcome, RoundReport},
};

/// Answer shown when a song was chosen but nobody can be named.
pub const UNRESOLVED_ANSWER: &str = "N/A (Data consistency issue)";
/// Answer shown when no question could be generated at all.
pub const NO_DATA_ANSWER: &str = "N/A";
/// Question shown when no question could be generated at all.
pub const NO_DATA_QUESTION: &str = "Error: No game data available to ask a question.";

/// Kind of question, driving how the answer is worded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Answer reads "most recently played".
    RecentListener,
    /// Answer reads "most recently added".
    SavedTrack,
    /// No question could be generated.
    Error,
}

impl From<QuestionStrategy> for QuestionType {
    fn from(value: QuestionStrategy) -> Self {
        match value {
            QuestionStrategy::RecentListener => QuestionType::RecentListener,
            QuestionStrategy::SavedTrack => QuestionType::SavedTrack,
        }
    }
}

/// Question payload returned for each generated round.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoundResponse {
    pub round_number: u64,
    pub question_text: String,
    pub song_name: String,
    pub artist_name: String,
    pub track_id: Option<String>,
    /// Display names of every joined participant.
    pub options: Vec<String>,
    /// Display name of the correct participant, or an `N/A` marker.
    pub answer: String,
    /// When the answering event happened (RFC 3339), if resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<String>,
    pub question_type: QuestionType,
    /// Non-fatal notes collected while generating the round (fallbacks, missing data).
    pub notices: Vec<String>,
}

impl RoundResponse {
    fn from_round(round_number: u64, round: Round, notices: Vec<String>) -> Self {
        let (answer, answered_at) = match round.answer {
            Answer::Resolved {
                display_name,
                occurred_at,
                ..
            } => (display_name, Some(format_timestamp(occurred_at))),
            Answer::Unresolved => (UNRESOLVED_ANSWER.to_string(), None),
        };

        Self {
            round_number,
            question_text: round.strategy.question_text().to_string(),
            song_name: round.song.track_name,
            artist_name: round.song.artist_name,
            track_id: round.song.track_id,
            options: round.options,
            answer,
            answered_at,
            question_type: round.strategy.into(),
            notices,
        }
    }

    fn no_data(round_number: u64, options: Vec<String>, notices: Vec<String>) -> Self {
        Self {
            round_number,
            question_text: NO_DATA_QUESTION.to_string(),
            song_name: String::new(),
            artist_name: String::new(),
            track_id: None,
            options,
            answer: NO_DATA_ANSWER.to_string(),
            answered_at: None,
            question_type: QuestionType::Error,
            notices,
        }
    }
}

impl RoundResponse {
    /// Render a round report; `options` is only used when no question was produced.
    pub fn from_report(report: RoundReport, options: Vec<String>) -> Self {
        match report.outcome {
            RoundOutcome::Question(round) => {
                Self::from_round(report.round_number, round, report.notices)
            }
            RoundOutcome::NoDataAvailable => {
                Self::no_data(report.round_number, options, report.notices)
            }
        }
    }
}
