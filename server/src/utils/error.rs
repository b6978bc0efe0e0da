use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::response::error as error_response;

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

/// A single rejected input field, reported in the error `details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid fields: {0:?}")]
    InvalidFields(Vec<FieldError>),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Insufficient seats: requested {requested}, only {remaining} remaining")]
    InsufficientSeats { requested: i32, remaining: i32 },

    #[error("Promotion invalid: {0}")]
    PromotionInvalid(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Amount mismatch: expected {expected}, received {received}")]
    AmountMismatch { expected: Decimal, received: Decimal },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientSeats { .. }
            | AppError::InvalidState(_)
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PromotionInvalid(_) | AppError::AmountMismatch { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::InvalidFields(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InsufficientSeats { .. } => "INSUFFICIENT_SEATS",
            AppError::PromotionInvalid(_) => "PROMOTION_INVALID",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            AppError::Conflict(_) => "CONFLICT",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
        }
    }

    /// Maps a constraint violation raised by a write into a client-facing
    /// conflict, leaving every other database error untouched.
    pub fn from_constraint(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(
                db_err.code().as_deref(),
                Some(FOREIGN_KEY_VIOLATION) | Some(UNIQUE_VIOLATION)
            ) {
                return AppError::Conflict(conflict_message.to_string());
            }
        }
        AppError::DatabaseError(err)
    }

    fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::PromotionInvalid(msg)
            | AppError::InvalidState(msg)
            | AppError::Conflict(msg)
            | AppError::ExternalServiceError(msg) => msg.clone(),
            AppError::InvalidFields(_) => "One or more fields are invalid".to_string(),
            AppError::InsufficientSeats { remaining, .. } => {
                format!("Not enough seats: only {} remaining", remaining)
            }
            AppError::AmountMismatch { expected, .. } => {
                format!("Payment amount must equal the booking total of {}", expected)
            }
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::InvalidFields(fields) => serde_json::to_value(fields).ok(),
            AppError::InsufficientSeats {
                requested,
                remaining,
            } => Some(serde_json::json!({
                "requested": requested,
                "remaining": remaining,
            })),
            AppError::AmountMismatch { expected, received } => Some(serde_json::json!({
                "expected": expected,
                "received": received,
            })),
            _ => None,
        }
    }

    fn log(&self) {
        match self {
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::ExternalServiceError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            _ => {
                warn!(code = self.code(), error = %self, "Request rejected");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        error_response(code, self.public_message(), self.details(), status)
    }
}
