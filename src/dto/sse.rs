use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::round::QuestionType;

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Event carrying an already rendered `data` field.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    pub stream: String,
    pub message: String,
    /// Number of participants joined at subscription time.
    pub participants: usize,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a participant joins or re-joins.
pub struct ParticipantJoinedEvent {
    pub id: String,
    pub display_name: String,
    /// `true` when an earlier record for the same participant was replaced.
    pub rejoined: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after a round is generated. The answer is left out on purpose for the audience.
pub struct RoundGeneratedEvent {
    pub game_id: Uuid,
    pub round_number: u64,
    pub question_text: String,
    pub song_name: String,
    pub artist_name: String,
    pub options: Vec<String>,
    pub question_type: QuestionType,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when every participant and game session has been cleared.
pub struct GameResetEvent {
    pub participants_removed: usize,
    pub sessions_removed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_event_serialises_payload() {
        let event = ServerEvent::json(
            Some("participant.joined".to_string()),
            &ParticipantJoinedEvent {
                id: "u1".into(),
                display_name: "Ada".into(),
                rejoined: false,
            },
        )
        .unwrap();

        assert_eq!(event.event.as_deref(), Some("participant.joined"));
        assert_eq!(
            event.data,
            r#"{"id":"u1","display_name":"Ada","rejoined":false}"#
        );
    }
}
