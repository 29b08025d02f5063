//! Error types raised by the Spotify provider implementation.

use reqwest::StatusCode;
use thiserror::Error;

use crate::provider::error::ProviderError;

/// Convenient result alias returning [`SpotifyError`] failures.
pub type SpotifyResult<T> = Result<T, SpotifyError>;

/// Failures that can occur while interacting with Spotify.
#[derive(Debug, Error)]
pub enum SpotifyError {
    /// Required environment variable is missing.
    #[error("missing Spotify environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build Spotify client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The configured accounts URL cannot be turned into an authorize URL.
    #[error("invalid Spotify authorize URL `{url}`: {reason}")]
    AuthorizeUrl { url: String, reason: String },
    /// A request could not be sent.
    #[error("failed to send Spotify request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// Spotify returned an unexpected status code.
    #[error("unexpected Spotify response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// Response payload could not be decoded.
    #[error("failed to decode Spotify response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<SpotifyError> for ProviderError {
    fn from(err: SpotifyError) -> Self {
        let rejected = matches!(
            &err,
            SpotifyError::RequestStatus { status, .. }
                if matches!(
                    *status,
                    StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
                )
        );

        if rejected {
            ProviderError::unauthorized(err.to_string())
        } else {
            ProviderError::unavailable(err.to_string(), err)
        }
    }
}
