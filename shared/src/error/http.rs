//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::ProviderNotFound
            | Self::AppointmentNotFound
            | Self::ClientNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::SlotUnavailable | Self::ClientAlreadyExists => {
                StatusCode::CONFLICT
            }

            // 503 Service Unavailable (transient, caller can retry)
            Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (validation and business rules)
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::InvalidSchedule
            | Self::InvalidWeekday
            | Self::AppointmentInPast
            | Self::AppointmentCancelled
            | Self::InvalidClientName => StatusCode::BAD_REQUEST,
        }
    }
}
