use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload alongside the joined participant count.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let participants = state.history().snapshot().await.len();
    HealthResponse::ok(participants)
}
