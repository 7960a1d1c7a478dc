//! REST API module.
//!
//! Thin handlers over the lead repository and the statistics engine.

mod leads;
mod stats;

pub use leads::*;
pub use stats::*;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::stats::LeadFilter;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Turn `?period=&manager=` into a filter, reporting bad values in the envelope.
fn lead_filter(query: Result<Query<LeadFilter>, QueryRejection>) -> Result<LeadFilter, AppError> {
    query
        .map(|Query(filter)| filter)
        .map_err(|e| AppError::BadRequest(format!("Invalid filter: {}", e.body_text())))
}

/// Unwrap a JSON body, reporting malformed input in the envelope.
fn lead_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|e| AppError::BadRequest(format!("Invalid lead: {}", e.body_text())))
}
