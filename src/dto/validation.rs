//! Validation helpers for DTOs.

use validator::ValidationError;

/// Length of a login `state` value: a simple-formatted UUID.
pub const OAUTH_STATE_LEN: usize = 32;

/// Validates that a login `state` is exactly 32 lowercase hexadecimal characters.
///
/// # Examples
///
/// ```ignore
/// validate_oauth_state("0123456789abcdef0123456789abcdef") // Ok
/// validate_oauth_state("0123456789ABCDEF0123456789ABCDEF") // Err - uppercase
/// validate_oauth_state("deadbeef")                         // Err - too short
/// ```
pub fn validate_oauth_state(state: &str) -> Result<(), ValidationError> {
    if state.len() != OAUTH_STATE_LEN {
        let mut err = ValidationError::new("oauth_state_length");
        err.message = Some(
            format!(
                "Login state must be exactly {OAUTH_STATE_LEN} characters (got {})",
                state.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !state
        .chars()
        .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    {
        let mut err = ValidationError::new("oauth_state_format");
        err.message = Some("Login state must contain only lowercase hexadecimal characters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_validate_oauth_state_valid() {
        assert!(validate_oauth_state("0123456789abcdef0123456789abcdef").is_ok());
        let generated = Uuid::new_v4().simple().to_string();
        assert!(validate_oauth_state(&generated).is_ok());
    }

    #[test]
    fn test_validate_oauth_state_invalid_length() {
        assert!(validate_oauth_state("deadbeef").is_err());
        assert!(validate_oauth_state("0123456789abcdef0123456789abcdef0").is_err());
        assert!(validate_oauth_state("").is_err());
    }

    #[test]
    fn test_validate_oauth_state_invalid_format() {
        assert!(validate_oauth_state("0123456789ABCDEF0123456789ABCDEF").is_err()); // uppercase
        assert!(validate_oauth_state("0123456789abcdef0123456789abcdeg").is_err()); // invalid hex
        assert!(validate_oauth_state("01234567-89ab-cdef-0123-456789ab").is_err()); // hyphens
    }
}
