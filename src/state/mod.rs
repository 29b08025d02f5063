pub mod game;
pub mod history;
mod sse;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use uuid::Uuid;

use crate::{config::AppConfig, provider::MusicProvider, state::game::GameSession};

pub use self::history::{HistorySnapshot, HistoryStore};
pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

/// Central application state shared by every request handler.
pub struct AppState {
    config: AppConfig,
    provider: Arc<dyn MusicProvider>,
    history: HistoryStore,
    sessions: DashMap<Uuid, GameSession>,
    pending_logins: DashMap<String, Instant>,
    sse: SseHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, provider: Arc<dyn MusicProvider>) -> SharedState {
        let sse = SseHub::new(config.sse_capacity);
        Arc::new(Self {
            config,
            provider,
            history: HistoryStore::new(),
            sessions: DashMap::new(),
            pending_logins: DashMap::new(),
            sse,
        })
    }

    /// Runtime configuration loaded at startup.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Music provider used for the join flow.
    pub fn provider(&self) -> Arc<dyn MusicProvider> {
        Arc::clone(&self.provider)
    }

    /// Participant histories shared by every game session.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Game sessions keyed by their identifier.
    pub fn sessions(&self) -> &DashMap<Uuid, GameSession> {
        &self.sessions
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Remember a login `state` so the matching callback can be accepted once.
    pub fn register_login(&self, oauth_state: String) {
        self.prune_logins(self.config.oauth_state_ttl);
        self.pending_logins.insert(oauth_state, Instant::now());
    }

    /// Consume a login `state`, returning whether it was issued and has not expired.
    pub fn redeem_login(&self, oauth_state: &str) -> bool {
        match self.pending_logins.remove(oauth_state) {
            Some((_, issued_at)) => issued_at.elapsed() <= self.config.oauth_state_ttl,
            None => false,
        }
    }

    fn prune_logins(&self, ttl: Duration) {
        self.pending_logins
            .retain(|_, issued_at| issued_at.elapsed() <= ttl);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{FakeProvider, state_with};

    #[test]
    fn login_state_is_single_use() {
        let state = state_with(FakeProvider::default());
        state.register_login("abc".into());

        assert!(state.redeem_login("abc"));
        assert!(!state.redeem_login("abc"));
        assert!(!state.redeem_login("never-issued"));
    }

    #[test]
    fn expired_login_state_is_rejected() {
        let mut config = AppConfig::default();
        config.oauth_state_ttl = Duration::ZERO;
        let state = AppState::new(config, Arc::new(FakeProvider::default()));
        state.register_login("abc".into());
        std::thread::sleep(Duration::from_millis(5));

        assert!(!state.redeem_login("abc"));
    }
}
