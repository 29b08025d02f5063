use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        game::{GameSessionResponse, ResetResponse},
        round::RoundResponse,
    },
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes handling game sessions and round generation.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/reset", post(reset_game))
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/rounds", post(next_round))
}

/// Start a game over the participants joined so far.
#[utoipa::path(
    post,
    path = "/games",
    tag = "game",
    responses(
        (status = 200, description = "Game created", body = GameSessionResponse),
        (status = 409, description = "No participant has joined yet")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
) -> Result<Json<GameSessionResponse>, AppError> {
    let session = game_service::create_session(&state).await?;
    Ok(Json(session))
}

/// Describe an existing game.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "game",
    params(("id" = Uuid, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Game found", body = GameSessionResponse),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameSessionResponse>, AppError> {
    let session = game_service::get_session(&state, id).await?;
    Ok(Json(session))
}

/// Generate the next question of a game.
#[utoipa::path(
    post,
    path = "/games/{id}/rounds",
    tag = "game",
    params(("id" = Uuid, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Round generated", body = RoundResponse),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn next_round(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoundResponse>, AppError> {
    let round = game_service::next_round(&state, id).await?;
    Ok(Json(round))
}

/// Drop every participant and game.
#[utoipa::path(
    post,
    path = "/games/reset",
    tag = "game",
    responses((status = 200, description = "Game state cleared", body = ResetResponse))
)]
pub async fn reset_game(State(state): State<SharedState>) -> Json<ResetResponse> {
    Json(game_service::reset(&state).await)
}
