use axum::{
    Json, Router,
    extract::{Query, State},
    response::Redirect,
    routing::get,
};
use axum_valid::Valid;

use crate::{
    dto::auth::{CallbackQuery, JoinResponse},
    error::AppError,
    services::join_service,
    state::SharedState,
};

/// Routes driving the provider login that makes a participant join.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/auth/login", get(login))
        .route("/auth/callback", get(callback))
}

/// Redirect the browser to the provider's consent page.
#[utoipa::path(
    get,
    path = "/auth/login",
    tag = "auth",
    responses(
        (status = 303, description = "Redirect to the provider authorization page"),
        (status = 502, description = "Authorization URL could not be built")
    )
)]
pub async fn login(State(state): State<SharedState>) -> Result<Redirect, AppError> {
    let url = join_service::begin_login(&state)?;
    Ok(Redirect::to(&url))
}

/// Complete the login, ingest the participant's history and register them.
#[utoipa::path(
    get,
    path = "/auth/callback",
    tag = "auth",
    params(CallbackQuery),
    responses(
        (status = 200, description = "Participant joined", body = JoinResponse),
        (status = 400, description = "Malformed callback parameters"),
        (status = 401, description = "Unknown login state or declined authorization"),
        (status = 502, description = "Music provider unavailable")
    )
)]
pub async fn callback(
    State(state): State<SharedState>,
    Valid(Query(query)): Valid<Query<CallbackQuery>>,
) -> Result<Json<JoinResponse>, AppError> {
    let joined = join_service::complete_join(&state, query).await?;
    Ok(Json(joined))
}
