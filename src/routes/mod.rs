use axum::Router;

use crate::state::SharedState;

pub mod auth;
pub mod docs;
pub mod game;
pub mod health;
pub mod public;
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(auth::router())
        .merge(public::router())
        .merge(game::router())
        .merge(docs::router());

    api_router.with_state(state)
}
