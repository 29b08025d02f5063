use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Replay Trivia.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::auth::login,
        crate::routes::auth::callback,
        crate::routes::public::list_participants,
        crate::routes::game::create_game,
        crate::routes::game::get_game,
        crate::routes::game::next_round,
        crate::routes::game::reset_game,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::auth::JoinResponse,
            crate::dto::game::GameSessionResponse,
            crate::dto::game::ParticipantSummary,
            crate::dto::game::ParticipantsResponse,
            crate::dto::game::ResetResponse,
            crate::dto::round::RoundResponse,
            crate::dto::round::QuestionType,
            crate::dto::sse::Handshake,
            crate::dto::sse::ParticipantJoinedEvent,
            crate::dto::sse::RoundGeneratedEvent,
            crate::dto::sse::GameResetEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "auth", description = "Provider login used to join the game"),
        (name = "public", description = "Read-only participant information"),
        (name = "game", description = "Game sessions and question rounds"),
    )
)]
pub struct ApiDoc;
