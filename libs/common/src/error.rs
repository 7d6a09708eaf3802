//! Custom error types shared by the pizza shop services
//!
//! `DatabaseError` covers infrastructure failures raised by the stores,
//! `AppError` is the domain taxonomy every service returns and the HTTP layer
//! turns into a status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::Error as SqlxError;
use thiserror::Error;
use tracing::error;

use crate::jwt::TokenError;
use crate::validation::ValidationErrors;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique or foreign key constraint rejected the write
    #[error("Constraint violation: {0}")]
    Conflict(String),

    /// A numeric value does not fit its column or type
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// A stored value could not be mapped back into a model
    #[error("Invalid stored value: {0}")]
    Decode(String),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return DatabaseError::Conflict("Record already exists".to_string());
            }
            if db_err.is_foreign_key_violation() {
                return DatabaseError::Conflict(
                    "Referenced record is missing or still in use".to_string(),
                );
            }
            // numeric_value_out_of_range
            if db_err.code().as_deref() == Some("22003") {
                return DatabaseError::OutOfRange("Numeric value out of range".to_string());
            }
        }
        DatabaseError::Query(err)
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Error kinds surfaced by the services
#[derive(Error, Debug)]
pub enum AppError {
    /// Business rule violation, e.g. mismatched passwords
    #[error("{0}")]
    Validation(String),

    /// Payload failed schema validation
    #[error("Invalid request payload")]
    BadRequest(#[from] ValidationErrors),

    #[error("{0}")]
    NotFound(String),

    /// Credential mismatch or unresolved reference
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// Duplicate unique key
    #[error("{0}")]
    Conflict(String),

    /// The payment gateway failed or rejected the call
    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error kind
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::Database(DatabaseError::OutOfRange(_)) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) | AppError::Database(DatabaseError::Conflict(_)) => {
                StatusCode::CONFLICT
            }
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Token(TokenError::Invalid(_)) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Token(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            error!(error = %self, "Request failed");
        }

        let body = match &self {
            AppError::BadRequest(errors) => json!({
                "error": self.to_string(),
                "fields": errors.fields(),
            }),
            AppError::Database(DatabaseError::Conflict(msg) | DatabaseError::OutOfRange(msg)) => {
                json!({ "error": msg })
            }
            AppError::Database(_) | AppError::Token(_) | AppError::Internal(_) => {
                json!({ "error": "Internal server error" })
            }
            AppError::Gateway(_) => json!({ "error": "Payment gateway error" }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for service results
pub type AppResult<T> = Result<T, AppError>;
