//! Unified error codes for the booking server
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Schedule / availability errors
//! - 2xxx: Appointment errors
//! - 3xxx: Client errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the chat transport and
/// any HTTP caller see the same numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Schedule ====================
    /// Provider not found
    ProviderNotFound = 1001,
    /// Schedule entry is malformed (times out of order, half a break, ...)
    InvalidSchedule = 1002,
    /// Weekday outside 0..=6
    InvalidWeekday = 1003,

    // ==================== 2xxx: Appointment ====================
    /// Appointment not found
    AppointmentNotFound = 2001,
    /// The requested slot is already held by a non-cancelled appointment
    SlotUnavailable = 2002,
    /// Appointment time lies in the past
    AppointmentInPast = 2003,
    /// Appointment is cancelled and cannot change
    AppointmentCancelled = 2004,

    // ==================== 3xxx: Client ====================
    /// Client not found
    ClientNotFound = 3001,
    /// A client with this phone is already registered
    ClientAlreadyExists = 3002,
    /// Client name rejected
    InvalidClientName = 3003,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// An external call did not answer in time
    TimeoutError = 9004,
}

impl ErrorCode {
    /// Numeric value of the code
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this code represents success
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Default message for the code
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",

            Self::ProviderNotFound => "Provider not found",
            Self::InvalidSchedule => "Invalid schedule entry",
            Self::InvalidWeekday => "Weekday must be between 0 and 6",

            Self::AppointmentNotFound => "Appointment not found",
            Self::SlotUnavailable => "This time slot is no longer available",
            Self::AppointmentInPast => "Appointment time is in the past",
            Self::AppointmentCancelled => "Appointment is cancelled",

            Self::ClientNotFound => "Client not found",
            Self::ClientAlreadyExists => "Client already registered",
            Self::InvalidClientName => "Invalid client name",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
            Self::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),

            // Schedule
            1001 => Ok(ErrorCode::ProviderNotFound),
            1002 => Ok(ErrorCode::InvalidSchedule),
            1003 => Ok(ErrorCode::InvalidWeekday),

            // Appointment
            2001 => Ok(ErrorCode::AppointmentNotFound),
            2002 => Ok(ErrorCode::SlotUnavailable),
            2003 => Ok(ErrorCode::AppointmentInPast),
            2004 => Ok(ErrorCode::AppointmentCancelled),

            // Client
            3001 => Ok(ErrorCode::ClientNotFound),
            3002 => Ok(ErrorCode::ClientAlreadyExists),
            3003 => Ok(ErrorCode::InvalidClientName),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::ProviderNotFound.code(), 1001);
        assert_eq!(ErrorCode::SlotUnavailable.code(), 2002);
        assert_eq!(ErrorCode::ClientNotFound.code(), 3001);
        assert_eq!(ErrorCode::TimeoutError.code(), 9004);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(2002), Ok(ErrorCode::SlotUnavailable));
        assert_eq!(ErrorCode::try_from(3002), Ok(ErrorCode::ClientAlreadyExists));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::DatabaseError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(
            InvalidErrorCode(4242).to_string(),
            "invalid error code: 4242"
        );
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::SlotUnavailable).unwrap();
        assert_eq!(json, "2002");

        let code: ErrorCode = serde_json::from_str("2001").unwrap();
        assert_eq!(code, ErrorCode::AppointmentNotFound);

        assert!(serde_json::from_str::<ErrorCode>("77").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::AppointmentInPast.to_string(), "2003");
    }
}
