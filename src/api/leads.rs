//! Lead API endpoints.

use std::cmp::Reverse;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::Utc;

use super::{lead_body, lead_filter, success, ApiResult};
use crate::errors::AppError;
use crate::models::{Lead, LeadUpdate, NewLead};
use crate::stats::LeadFilter;
use crate::AppState;

fn validate(name: &str, value: f64) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(
            "Value must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/leads - List leads matching the filter, newest first.
pub async fn list_leads(
    State(state): State<AppState>,
    query: Result<Query<LeadFilter>, QueryRejection>,
) -> ApiResult<Vec<Lead>> {
    let filter = lead_filter(query)?;
    let book = state.repo.list_all().await?;

    let mut leads: Vec<Lead> = filter
        .apply(book.iter(), Utc::now())
        .into_iter()
        .cloned()
        .collect();
    leads.sort_by_key(|lead| Reverse(lead.created_at));

    success(leads)
}

/// GET /api/leads/:id - Get a single lead.
pub async fn get_lead(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Lead> {
    success(state.repo.get(&id).await?)
}

/// POST /api/leads - Create a new lead.
pub async fn create_lead(
    State(state): State<AppState>,
    body: Result<Json<NewLead>, JsonRejection>,
) -> ApiResult<Lead> {
    let request = lead_body(body)?;
    validate(&request.name, request.value)?;
    success(state.repo.create(request).await?)
}

/// PUT /api/leads/:id - Replace a lead. `id`, `createdAt` and `kpi` in the body are ignored.
pub async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<LeadUpdate>, JsonRejection>,
) -> ApiResult<Lead> {
    let request = lead_body(body)?;
    validate(&request.name, request.value)?;
    success(state.repo.update(&id, request).await?)
}

/// DELETE /api/leads/:id - Delete a lead.
pub async fn delete_lead(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.repo.delete(&id).await?;
    success(())
}
