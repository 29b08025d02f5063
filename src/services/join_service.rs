//! Login flow that turns a provider authorization into a participant record.

use tracing::info;
use uuid::Uuid;

use crate::{
    dto::auth::{CallbackQuery, JoinResponse},
    error::ServiceError,
    provider::models::{Ingested, ingest},
    services::sse_events,
    state::{
        SharedState,
        game::{ParticipantRecord, PlayEvent, SaveEvent},
    },
};

/// Issue a fresh login `state` and return the provider URL the user is redirected to.
pub fn begin_login(state: &SharedState) -> Result<String, ServiceError> {
    let oauth_state = Uuid::new_v4().simple().to_string();
    let url = state.provider().authorize_url(&oauth_state)?;
    state.register_login(oauth_state);
    Ok(url)
}

/// Finish a login: fetch the participant's histories, store them and announce the join.
///
/// The record is stored only after every provider call has succeeded.
pub async fn complete_join(
    state: &SharedState,
    query: CallbackQuery,
) -> Result<JoinResponse, ServiceError> {
    if !state.redeem_login(&query.state) {
        return Err(ServiceError::Unauthorized(
            "unknown or expired login state".into(),
        ));
    }
    if let Some(error) = query.error {
        return Err(ServiceError::Unauthorized(format!(
            "login declined by provider: {error}"
        )));
    }
    let code = query
        .code
        .ok_or_else(|| ServiceError::InvalidInput("missing authorization code".into()))?;

    let provider = state.provider();
    let config = state.config();

    let token = provider.exchange_code(code).await?;
    let profile = provider.fetch_profile(token.clone()).await?;
    let (plays, saves) = tokio::try_join!(
        provider.fetch_listening_history(token.clone(), config.recent_limit),
        provider.fetch_saved_library(token, config.saved_limit),
    )?;

    let timeline: Ingested<PlayEvent> = ingest(&profile.id, "timeline", plays);
    let saved: Ingested<SaveEvent> = ingest(&profile.id, "saved_tracks", saves);

    let record = ParticipantRecord::new(
        profile.id,
        profile.display_name,
        timeline.accepted,
        saved.accepted,
    );
    let mut response = JoinResponse {
        id: record.id.clone(),
        display_name: record.display_name.clone(),
        plays: record.timeline().len(),
        saves: record.saved_tracks().len(),
        rejected: timeline.rejected + saved.rejected,
        rejoined: false,
    };

    response.rejoined = state.history().put(record).await;
    info!(
        participant = %response.id,
        plays = response.plays,
        saves = response.saves,
        rejected = response.rejected,
        rejoined = response.rejoined,
        "participant joined"
    );
    sse_events::broadcast_participant_joined(state, &response);

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        provider::models::{
            ProviderProfile, RawArtist, RawPlayHistoryItem, RawSavedTrackItem, RawTrack,
        },
        state::test_support::{FakeProvider, FakeUser, state_with},
    };

    fn track(id: &str, name: Option<&str>) -> Option<RawTrack> {
        Some(RawTrack {
            id: Some(id.into()),
            name: name.map(str::to_string),
            artists: Some(vec![RawArtist {
                name: Some("Band".into()),
            }]),
        })
    }

    fn user(code: &str, id: &str, display_name: Option<&str>) -> FakeUser {
        FakeUser {
            code: code.into(),
            profile: ProviderProfile {
                id: id.into(),
                display_name: display_name.map(str::to_string),
            },
            plays: vec![
                RawPlayHistoryItem {
                    track: track("t1", Some("Song")),
                    played_at: Some("2024-05-01T10:00:00.250Z".into()),
                },
                RawPlayHistoryItem {
                    track: track("t2", None),
                    played_at: Some("2024-05-01T11:00:00Z".into()),
                },
            ],
            saves: vec![RawSavedTrackItem {
                track: track("t3", Some("Other")),
                added_at: Some("2024-04-01T09:00:00Z".into()),
            }],
            fail_history: false,
        }
    }

    fn callback(state: &SharedState, code: &str) -> CallbackQuery {
        let url = begin_login(state).unwrap();
        let oauth_state = url.rsplit("state=").next().unwrap().to_string();
        CallbackQuery {
            code: Some(code.into()),
            state: oauth_state,
            error: None,
        }
    }

    #[tokio::test]
    async fn join_ingests_histories_and_announces_participant() {
        let state = state_with(FakeProvider::default().with_user(user("c1", "u1", Some("Ada"))));
        let mut events = state.public_sse().subscribe();

        let query = callback(&state, "c1");
        let response = complete_join(&state, query).await.unwrap();

        assert_eq!(response.display_name, "Ada");
        assert_eq!((response.plays, response.saves, response.rejected), (1, 1, 1));
        assert!(!response.rejoined);

        let snapshot = state.history().snapshot().await;
        assert_eq!(snapshot.display_names(), vec!["Ada"]);

        let event = events.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("participant.joined"));
    }

    #[tokio::test]
    async fn join_requests_configured_limits() {
        let provider = std::sync::Arc::new(
            FakeProvider::default().with_user(user("c1", "u1", None)),
        );
        let state = crate::state::AppState::new(
            crate::config::AppConfig::default(),
            provider.clone(),
        );

        let query = callback(&state, "c1");
        let response = complete_join(&state, query).await.unwrap();

        assert_eq!(response.display_name, "u1");
        let mut limits = provider.requested_limits.lock().unwrap().clone();
        limits.sort();
        assert_eq!(limits, vec![(0, 2000), (50, 0)]);
    }

    #[tokio::test]
    async fn rejoin_replaces_previous_record() {
        let state = state_with(
            FakeProvider::default()
                .with_user(user("c1", "u1", Some("Ada")))
                .with_user(user("c2", "u1", Some("Ada L."))),
        );

        complete_join(&state, callback(&state, "c1")).await.unwrap();
        let second = complete_join(&state, callback(&state, "c2")).await.unwrap();

        assert!(second.rejoined);
        assert_eq!(state.history().snapshot().await.display_names(), vec!["Ada L."]);
    }

    #[tokio::test]
    async fn provider_failure_stores_nothing() {
        let mut failing = user("c1", "u1", Some("Ada"));
        failing.fail_history = true;
        let state = state_with(FakeProvider::default().with_user(failing));

        let err = complete_join(&state, callback(&state, "c1")).await.unwrap_err();

        assert!(matches!(err, ServiceError::Upstream(_)));
        assert!(state.history().snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_state_is_rejected_before_calling_provider() {
        let state = state_with(FakeProvider::default().with_user(user("c1", "u1", None)));
        let query = CallbackQuery {
            code: Some("c1".into()),
            state: "0123456789abcdef0123456789abcdef".into(),
            error: None,
        };

        let err = complete_join(&state, query).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn declined_login_is_unauthorized() {
        let state = state_with(FakeProvider::default());
        let mut query = callback(&state, "ignored");
        query.code = None;
        query.error = Some("access_denied".into());

        let err = complete_join(&state, query).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(ref m) if m.contains("access_denied")));
    }
}
