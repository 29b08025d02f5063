use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::format_timestamp,
    state::game::{GameSession, ParticipantRecord},
};

/// Game session as exposed to the host.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameSessionResponse {
    pub id: Uuid,
    /// Creation time (RFC 3339).
    pub created_at: String,
    /// Number of rounds generated so far.
    pub rounds_played: u64,
    /// Display names of the participants joined when the response was built.
    pub participants: Vec<String>,
}

impl GameSessionResponse {
    pub fn new(session: &GameSession, participants: Vec<String>) -> Self {
        Self {
            id: session.id,
            created_at: format_timestamp(session.created_at),
            rounds_played: session.round_number,
            participants,
        }
    }
}

/// Joined participant with the size of each ingested history.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantSummary {
    pub id: String,
    pub display_name: String,
    pub plays: usize,
    pub saves: usize,
}

impl From<&ParticipantRecord> for ParticipantSummary {
    fn from(record: &ParticipantRecord) -> Self {
        Self {
            id: record.id.clone(),
            display_name: record.display_name.clone(),
            plays: record.timeline().len(),
            saves: record.saved_tracks().len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantsResponse {
    pub participants: Vec<ParticipantSummary>,
}

/// Outcome of clearing the game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResetResponse {
    pub participants_removed: usize,
    pub sessions_removed: usize,
}
