//! Application-level configuration loading, including history fetch limits.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "REPLAY_TRIVIA_CONFIG_PATH";
/// Most plays the provider returns in a single listening history call.
pub const MAX_RECENT_LIMIT: usize = 50;

const DEFAULT_SAVED_LIMIT: usize = 2000;
const DEFAULT_OAUTH_STATE_TTL_SECS: u64 = 600;
const DEFAULT_SSE_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Number of recent plays fetched per participant on join.
    pub recent_limit: usize,
    /// Cap on saved library entries fetched per participant on join.
    pub saved_limit: usize,
    /// How long a login `state` stays redeemable.
    pub oauth_state_ttl: Duration,
    /// Capacity of the public SSE broadcast channel.
    pub sse_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        recent_limit = app_config.recent_limit,
                        saved_limit = app_config.saved_limit,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    recent_limit: Option<usize>,
    #[serde(default)]
    saved_limit: Option<usize>,
    #[serde(default)]
    oauth_state_ttl_secs: Option<u64>,
    #[serde(default)]
    sse_capacity: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            recent_limit: value
                .recent_limit
                .unwrap_or(MAX_RECENT_LIMIT)
                .clamp(1, MAX_RECENT_LIMIT),
            saved_limit: value.saved_limit.unwrap_or(DEFAULT_SAVED_LIMIT),
            oauth_state_ttl: Duration::from_secs(
                value
                    .oauth_state_ttl_secs
                    .unwrap_or(DEFAULT_OAUTH_STATE_TTL_SECS),
            ),
            sse_capacity: value.sse_capacity.unwrap_or(DEFAULT_SSE_CAPACITY).max(1),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
