use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        auth::JoinResponse,
        round::RoundResponse,
        sse::{GameResetEvent, ParticipantJoinedEvent, RoundGeneratedEvent, ServerEvent},
    },
    state::SharedState,
};

const EVENT_PARTICIPANT_JOINED: &str = "participant.joined";
const EVENT_ROUND_GENERATED: &str = "round.generated";
const EVENT_GAME_RESET: &str = "game.reset";

/// Broadcast that a participant joined (or re-joined) the game.
pub fn broadcast_participant_joined(state: &SharedState, joined: &JoinResponse) {
    let payload = ParticipantJoinedEvent {
        id: joined.id.clone(),
        display_name: joined.display_name.clone(),
        rejoined: joined.rejoined,
    };
    send_public_event(state, EVENT_PARTICIPANT_JOINED, &payload);
}

/// Broadcast the question of a freshly generated round, without its answer.
pub fn broadcast_round_generated(state: &SharedState, game_id: Uuid, round: &RoundResponse) {
    let payload = RoundGeneratedEvent {
        game_id,
        round_number: round.round_number,
        question_text: round.question_text.clone(),
        song_name: round.song_name.clone(),
        artist_name: round.artist_name.clone(),
        options: round.options.clone(),
        question_type: round.question_type,
    };
    send_public_event(state, EVENT_ROUND_GENERATED, &payload);
}

/// Broadcast that the game was cleared.
pub fn broadcast_game_reset(state: &SharedState, participants_removed: usize, sessions_removed: usize) {
    let payload = GameResetEvent {
        participants_removed,
        sessions_removed,
    };
    send_public_event(state, EVENT_GAME_RESET, &payload);
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
