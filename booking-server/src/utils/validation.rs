//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Shortest accepted client name (chars)
pub const MIN_CLIENT_NAME_LEN: usize = 2;

/// Entity names: client, provider, service
pub const MAX_NAME_LEN: usize = 100;

/// Phone numbers (digits only after normalization)
pub const MAX_PHONE_LEN: usize = 20;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

/// Validate a client name and return it trimmed
pub fn validate_client_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    let len = name.chars().count();
    if len < MIN_CLIENT_NAME_LEN {
        return Err(AppError::with_message(
            ErrorCode::InvalidClientName,
            format!("Client name must have at least {MIN_CLIENT_NAME_LEN} characters"),
        ));
    }
    if len > MAX_NAME_LEN {
        return Err(AppError::with_message(
            ErrorCode::InvalidClientName,
            format!("Client name is too long ({len} chars, max {MAX_NAME_LEN})"),
        ));
    }
    Ok(name.to_string())
}

/// Validate a normalized phone number (digits only)
pub fn validate_phone(phone: &str) -> Result<(), AppError> {
    validate_required_text(phone, "phone", MAX_PHONE_LEN)?;
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation("phone must contain digits only"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_name_bounds() {
        assert_eq!(validate_client_name("  Jo ").unwrap(), "Jo");
        assert_eq!(
            validate_client_name("J").unwrap_err().code,
            ErrorCode::InvalidClientName
        );
        assert!(validate_client_name("   ").is_err());
        assert!(validate_client_name(&"a".repeat(MAX_NAME_LEN + 1)).is_err());
        // Counted in chars, not bytes
        assert!(validate_client_name("Zé").is_ok());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("5511999998888").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("55-11").is_err());
    }
}
