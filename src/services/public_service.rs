//! Service helpers that expose read-only public projections of the joined participants.

use crate::{
    dto::game::{ParticipantSummary, ParticipantsResponse},
    state::SharedState,
};

/// Return every joined participant in join order with the size of their histories.
pub async fn list_participants(state: &SharedState) -> ParticipantsResponse {
    let snapshot = state.history().snapshot().await;
    ParticipantsResponse {
        participants: snapshot.iter().map(ParticipantSummary::from).collect(),
    }
}
