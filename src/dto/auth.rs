use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::dto::validation::validate_oauth_state;

/// Query parameters the provider appends when redirecting back after a login.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    /// Authorization code; absent when the user denied access.
    #[validate(length(min = 1, max = 2048))]
    pub code: Option<String>,
    /// Login state issued by `/auth/login`.
    #[validate(custom(function = "validate_oauth_state"))]
    pub state: String,
    /// Error reported by the provider, e.g. `access_denied`.
    pub error: Option<String>,
}

/// Summary returned once a participant's history has been ingested.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JoinResponse {
    pub id: String,
    pub display_name: String,
    /// Plays accepted into the timeline.
    pub plays: usize,
    /// Saved tracks accepted into the library.
    pub saves: usize,
    /// Provider items skipped because they were incomplete.
    pub rejected: usize,
    /// `true` when this replaced an earlier record for the same participant.
    pub rejoined: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_query_rejects_malformed_state() {
        let query = CallbackQuery {
            code: Some("abc".into()),
            state: "not-a-state".into(),
            error: None,
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn callback_query_accepts_denied_login() {
        let query = CallbackQuery {
            code: None,
            state: "0123456789abcdef0123456789abcdef".into(),
            error: Some("access_denied".into()),
        };
        assert!(query.validate().is_ok());
    }
}
