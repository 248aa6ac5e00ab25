//! Validation helpers for DTOs.

use validator::ValidationError;

/// Minimum length of a session code.
pub const MIN_SESSION_CODE_LEN: usize = 4;

/// Validates that a session code is at least four alphanumeric characters.
///
/// # Examples
///
/// ```ignore
/// validate_session_code("ab12")  // Ok
/// validate_session_code("ab1")   // Err - too short
/// validate_session_code("ab-12") // Err - punctuation
/// ```
pub fn validate_session_code(code: &str) -> Result<(), ValidationError> {
    if code.len() < MIN_SESSION_CODE_LEN {
        let mut err = ValidationError::new("session_code_length");
        err.message = Some(
            format!(
                "Session code must be at least {MIN_SESSION_CODE_LEN} characters (got {})",
                code.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut err = ValidationError::new("session_code_format");
        err.message = Some("Session code must contain only alphanumeric characters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_session_code_valid() {
        assert!(validate_session_code("ab12").is_ok());
        assert!(validate_session_code("XYZ9").is_ok());
        assert!(validate_session_code("longer0code").is_ok());
    }

    #[test]
    fn test_validate_session_code_too_short() {
        assert!(validate_session_code("ab1").is_err());
        assert!(validate_session_code("").is_err());
    }

    #[test]
    fn test_validate_session_code_invalid_characters() {
        assert!(validate_session_code("ab-12").is_err());
        assert!(validate_session_code("ab 12").is_err());
        assert!(validate_session_code("ab12é").is_err());
    }
}
