use tracing::info;
use uuid::Uuid;

use crate::{
    dto::{
        game::{GameSessionResponse, ResetResponse},
        round::RoundResponse,
    },
    error::ServiceError,
    services::{round_selector, sse_events},
    state::{SharedState, game::GameSession},
};

/// Start a new game session over the participants joined so far.
pub async fn create_session(state: &SharedState) -> Result<GameSessionResponse, ServiceError> {
    let snapshot = state.history().snapshot().await;
    if snapshot.is_empty() {
        return Err(ServiceError::InvalidState("No players joined yet!".into()));
    }

    let session = GameSession::new();
    state.sessions().insert(session.id, session.clone());
    info!(game_id = %session.id, participants = snapshot.len(), "game session created");

    Ok(GameSessionResponse::new(&session, snapshot.display_names()))
}

/// Describe an existing session alongside the current participants.
pub async fn get_session(state: &SharedState, id: Uuid) -> Result<GameSessionResponse, ServiceError> {
    let session = state
        .sessions()
        .get(&id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| session_not_found(id))?;
    let participants = state.history().snapshot().await.display_names();
    Ok(GameSessionResponse::new(&session, participants))
}

/// Generate the next round of session `id`.
///
/// The round counter advances under the session entry lock, so concurrent requests never share a
/// round number. Participants joining mid-game are included from the next round on.
pub async fn next_round(state: &SharedState, id: Uuid) -> Result<RoundResponse, ServiceError> {
    let round_number = state
        .sessions()
        .get_mut(&id)
        .map(|mut entry| entry.next_round())
        .ok_or_else(|| session_not_found(id))?;

    let snapshot = state.history().snapshot().await;
    let report = {
        let mut rng = rand::rng();
        round_selector::generate_round(&snapshot, round_number, &mut rng)
    };
    let response = RoundResponse::from_report(report, snapshot.display_names());

    sse_events::broadcast_round_generated(state, id, &response);
    Ok(response)
}

/// Forget every participant and game session.
pub async fn reset(state: &SharedState) -> ResetResponse {
    let participants_removed = state.history().clear().await;
    let sessions_removed = state.sessions().len();
    state.sessions().clear();

    info!(participants_removed, sessions_removed, "game reset");
    sse_events::broadcast_game_reset(state, participants_removed, sessions_removed);

    ResetResponse {
        participants_removed,
        sessions_removed,
    }
}

fn session_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("game `{id}` not found"))
}
