//! Unified error system for the booking server
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Error body of the HTTP API
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors (validation, generic not found)
//! - 1xxx: Schedule errors
//! - 2xxx: Appointment errors (including the slot conflict)
//! - 3xxx: Client errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::ClientNotFound);
//! assert!(err.is_not_found());
//!
//! let err = AppError::slot_taken("10:00 is already booked")
//!     .with_detail("time", "10:00");
//! assert!(err.is_conflict());
//!
//! let response = ApiResponse::error(&err);
//! assert_eq!(response.code, Some(2002));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
