//! Error handling module for the lead tracker.
//!
//! Every repository failure is an `AppError`; the API layer maps it to an HTTP
//! status and the `{ success: false, error }` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::StoreError;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const DUPLICATE: &str = "DUPLICATE";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const STORE_ERROR: &str = "STORE_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Contact field that collided with an existing lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateField {
    Email,
    Phone,
}

impl DuplicateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateField::Email => "email",
            DuplicateField::Phone => "phone",
        }
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// A lead with the same email or phone already exists
    Duplicate {
        field: DuplicateField,
        message: String,
    },
    /// Lead not found
    NotFound(String),
    /// Validation error
    Validation(String),
    /// Underlying key-value store failed
    Store(String),
    /// Bad request
    BadRequest(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Duplicate { .. } => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Duplicate { .. } => codes::DUPLICATE,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Store(_) => codes::STORE_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Duplicate { message, .. } => message.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Store(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }

    pub fn duplicate(field: DuplicateField) -> Self {
        AppError::Duplicate {
            field,
            message: format!("A lead with this {} already exists", field.as_str()),
        }
    }

    pub fn lead_not_found(id: &str) -> Self {
        AppError::NotFound(format!("Lead {} not found", id))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Store error: {}", err);
        AppError::Store(format!("Storage unavailable: {}", err.0))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Store(format!("Could not serialize lead: {}", err))
    }
}

/// Error response envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<DuplicateField>,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let field = match error {
            AppError::Duplicate { field, .. } => Some(*field),
            _ => None,
        };

        Self {
            success: false,
            error: error.message(),
            code: error.error_code().to_string(),
            field,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_envelope_names_field() {
        let err = AppError::duplicate(DuplicateField::Phone);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let body = serde_json::to_value(ErrorResponse::new(&err)).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "DUPLICATE");
        assert_eq!(body["field"], "phone");
        assert_eq!(body["error"], "A lead with this phone already exists");
    }

    #[test]
    fn test_store_error_conversion() {
        let err: AppError = StoreError("disk full".to_string()).into();
        assert_eq!(err.error_code(), codes::STORE_ERROR);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().contains("disk full"));

        let body = serde_json::to_value(ErrorResponse::new(&err)).unwrap();
        assert!(body.get("field").is_none());
    }
}
