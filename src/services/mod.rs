/// Most-recent-event lookup over a history snapshot.
pub mod answer_resolver;
/// OpenAPI documentation generation.
pub mod documentation;
/// Game sessions, round generation and reset.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Provider login and history ingestion for new participants.
pub mod join_service;
/// Public service for read-only participant information.
pub mod public_service;
/// Question strategy pipeline producing each round.
pub mod round_selector;
/// Participant-fair song sampling.
pub mod song_picker;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
