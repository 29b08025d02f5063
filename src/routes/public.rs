use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::game::ParticipantsResponse, services::public_service, state::SharedState};

/// Read-only routes for the audience screen.
pub fn router() -> Router<SharedState> {
    Router::new().route("/participants", get(list_participants))
}

/// List the joined participants in join order.
#[utoipa::path(
    get,
    path = "/participants",
    tag = "public",
    responses((status = 200, description = "Joined participants", body = ParticipantsResponse))
)]
pub async fn list_participants(State(state): State<SharedState>) -> Json<ParticipantsResponse> {
    Json(public_service::list_participants(&state).await)
}
