use std::error::Error;

use thiserror::Error;

/// Result alias for music provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Error raised by music provider backends regardless of the underlying service.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider refused the authorization code or access token.
    #[error("provider rejected authorization: {message}")]
    Unauthorized { message: String },
    /// The provider could not be reached or answered with an unusable payload.
    #[error("provider unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl ProviderError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        ProviderError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct an authorization failure.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ProviderError::Unauthorized {
            message: message.into(),
        }
    }
}
