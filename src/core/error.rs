use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::{json, Value};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Business rule or input validation failure
    #[error("Validation error: {0}")]
    Validation(String),

    /// Field-level validation failure with per-field details
    #[error("Validation error: {message}")]
    InvalidFields { message: String, details: Value },

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate invoice, duplicate active discount, already-processed booking,
    /// or a stale write rejected by compare-and-swap
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed request that could not be interpreted at all
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short machine-readable name used in the `error` field of the envelope
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::InvalidFields { .. } => "ValidationError",
            AppError::NotFound(_) => "NotFound",
            AppError::Conflict(_) => "Conflict",
            AppError::BadRequest(_) | AppError::Json(_) => "BadRequest",
            AppError::Database(_) | AppError::Configuration(_) | AppError::Internal(_) => {
                "InternalError"
            }
        }
    }

    /// Human-readable message without the variant prefix
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => msg.clone(),
            AppError::InvalidFields { message, .. } => message.clone(),
            AppError::Json(e) => e.to_string(),
            AppError::Database(_) | AppError::Configuration(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    fn details(&self) -> Option<&Value> {
        match self {
            AppError::InvalidFields { details, .. } => Some(details),
            _ => None,
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(error = %self, "Request failed with internal error");
        }

        let mut body = json!({
            "status": "error",
            "error": self.kind(),
            "message": self.message(),
        });
        if let Some(details) = self.details() {
            body["details"] = details.clone();
        }

        HttpResponse::build(status_code).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidFields { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Conflict(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Build a field-level validation error from `(field, problem)` pairs
    pub fn invalid_fields(errors: Vec<(&str, String)>) -> Self {
        let details: Vec<Value> = errors
            .iter()
            .map(|(field, problem)| json!({ "field": field, "message": problem }))
            .collect();

        AppError::InvalidFields {
            message: format!("{} field(s) failed validation", errors.len()),
            details: Value::Array(details),
        }
    }
}

/// Collects field errors while validating a request payload
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, problem: impl Into<String>) {
        self.errors.push((field, problem.into()));
    }

    pub fn check(&mut self, condition: bool, field: &'static str, problem: &str) {
        if !condition {
            self.add(field, problem);
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_fields(self.errors))
        }
    }
}
