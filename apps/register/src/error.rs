//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Register                           │
//! │                                                                         │
//! │  operator types "qty 3 abc"                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command::parse ─── bad syntax ──────────────────────► ApiError         │
//! │         │                                              (INVALID_INPUT)  │
//! │         ▼                                                               │
//! │  Register::execute                                                      │
//! │         ├── CoreError::ProductNotFound ──────────────► NOT_FOUND        │
//! │         ├── CoreError::EmptyCart, QuantityLimit ─────► CART_ERROR       │
//! │         ├── CoreError::InvalidTransition ────────────► BUSINESS_LOGIC   │
//! │         └── ValidationError ─────────────────────────► VALIDATION_ERROR │
//! │                                                                         │
//! │  The loop prints the error and keeps running.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Printer failures are not errors here: they arrive as a
//! `PrintOutcome` and are shown as a notice.

use driwich_core::{CoreError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Error returned from a register command.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Product not found: 7" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product or order not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Command could not be parsed
    InvalidInput,

    /// Business rule refused the action
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// Unexpected failure (serialization, stdin)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::OrderNotFound(id) => ApiError::not_found("Order", &id),
            CoreError::EmptyCart => ApiError::new(ErrorCode::CartError, err.to_string()),
            CoreError::ProductUnavailable(_)
            | CoreError::QuantityLimit { .. }
            | CoreError::TotalOverflow => ApiError::new(ErrorCode::CartError, err.to_string()),
            CoreError::InvalidTransition { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Serialization failed: {}", err);
        ApiError::internal("Could not serialize data")
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::internal(format!("I/O error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driwich_core::OrderStatus;

    #[test]
    fn test_core_error_codes() {
        assert_eq!(ApiError::from(CoreError::EmptyCart).code, ErrorCode::CartError);
        assert_eq!(
            ApiError::from(CoreError::ProductNotFound("p-9".to_string())),
            ApiError::not_found("Product", "p-9")
        );

        let err = ApiError::from(CoreError::InvalidTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::Cancelled,
        });
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_validation_errors_unwrap() {
        let inner = ValidationError::Required {
            field: "name".to_string(),
        };
        let err = ApiError::from(CoreError::Validation(inner.clone()));
        assert_eq!(err, ApiError::from(inner));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_string(&ApiError::not_found("Order", "o-1")).unwrap();
        assert_eq!(json, r#"{"code":"NOT_FOUND","message":"Order not found: o-1"}"#);
    }
}
