//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// The code decides how a caller reacts: the conversation engine recovers
/// from [`ErrorCode::SlotUnavailable`] by re-querying availability and
/// treats everything else as a generic failure.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create a generic conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    /// The requested slot is held by another non-cancelled appointment
    pub fn slot_taken(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::SlotUnavailable, msg)
    }

    /// An external call exceeded its time budget
    pub fn timeout(operation: impl Into<String>) -> Self {
        let op = operation.into();
        Self::with_message(ErrorCode::TimeoutError, format!("{} timed out", op))
            .with_detail("operation", op)
    }

    // ==================== Inspection ====================

    /// Slot race lost on create/reschedule
    pub fn is_conflict(&self) -> bool {
        self.code == ErrorCode::SlotUnavailable
    }

    /// Any of the not-found codes
    pub fn is_not_found(&self) -> bool {
        self.http_status() == StatusCode::NOT_FOUND
    }

    /// Transient failure the caller may retry as-is
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::TimeoutError | ErrorCode::DatabaseError | ErrorCode::SlotUnavailable
        )
    }
}

/// Error body of every failed API call
///
/// - `code`: [`ErrorCode`] number
/// - `message`: Human-readable message
/// - `details`: Additional error details, when any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();

        // System errors keep their detail in the log, not in the body
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
            let body = ApiResponse::error(&AppError::new(self.code));
            return (status, Json(body)).into_response();
        }

        let body = ApiResponse::error(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::AppointmentNotFound);
        assert_eq!(err.code, ErrorCode::AppointmentNotFound);
        assert_eq!(err.message, "Appointment not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "when_utc")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "when_utc");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_conflict_is_distinguishable() {
        let err = AppError::slot_taken("slot 10:00 taken");
        assert!(err.is_conflict());
        assert!(err.is_retryable());
        assert_eq!(err.http_status(), StatusCode::CONFLICT);

        // A duplicate client is a conflict on HTTP but not the slot race
        let err = AppError::new(ErrorCode::ClientAlreadyExists);
        assert!(!err.is_conflict());
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_family() {
        assert!(AppError::new(ErrorCode::NotFound).is_not_found());
        assert!(AppError::new(ErrorCode::ClientNotFound).is_not_found());
        assert!(!AppError::validation("bad").is_not_found());
    }

    #[test]
    fn test_timeout_constructor() {
        let err = AppError::timeout("get_slots_for_date");
        assert_eq!(err.code, ErrorCode::TimeoutError);
        assert_eq!(err.message, "get_slots_for_date timed out");
        assert!(err.is_retryable());
        assert_eq!(err.http_status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::NotFound, "Appointment 9 not found");
        assert_eq!(format!("{}", err), "Appointment 9 not found");
    }

    #[test]
    fn test_api_response_error() {
        let err = AppError::slot_taken("taken").with_detail("time", "10:00");
        let response = ApiResponse::error(&err);

        assert_eq!(response.code, Some(2002));
        assert_eq!(response.message, "taken");
        assert!(response.details.is_some());
    }
}
