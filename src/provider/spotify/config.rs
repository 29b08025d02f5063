use super::error::{SpotifyError, SpotifyResult};

const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/auth/callback";
const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
/// Scopes needed to read the profile, recent plays, and the saved library.
pub const SCOPES: &str = "user-read-recently-played user-read-email user-library-read";

/// Runtime configuration describing how to talk to the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub accounts_url: String,
    pub api_url: String,
}

impl SpotifyConfig {
    /// Construct a configuration from explicit application credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.into(),
            accounts_url: DEFAULT_ACCOUNTS_URL.into(),
            api_url: DEFAULT_API_URL.into(),
        }
    }

    /// Override the callback URL registered with the Spotify application.
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> SpotifyResult<Self> {
        let client_id = required_var("SPOTIFY_CLIENT_ID")?;
        let client_secret = required_var("SPOTIFY_CLIENT_SECRET")?;

        let mut config = Self::new(client_id, client_secret);
        if let Some(redirect_uri) = optional_var("SPOTIFY_REDIRECT_URI") {
            config = config.with_redirect_uri(redirect_uri);
        }
        if let Some(accounts_url) = optional_var("SPOTIFY_ACCOUNTS_URL") {
            config.accounts_url = accounts_url;
        }
        if let Some(api_url) = optional_var("SPOTIFY_API_URL") {
            config.api_url = api_url;
        }

        Ok(config)
    }
}

fn required_var(var: &'static str) -> SpotifyResult<String> {
    optional_var(var).ok_or(SpotifyError::MissingEnvVar { var })
}

fn optional_var(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.trim().is_empty())
}
