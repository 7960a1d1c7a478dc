//! Dashboard statistics and catalog endpoints.

use axum::extract::{rejection::QueryRejection, Query, State};
use chrono::Utc;

use super::{lead_filter, success, ApiResult};
use crate::models::{Catalog, Dashboard};
use crate::stats::{self, LeadFilter};
use crate::AppState;

/// GET /api/stats - Filtered statistics plus the global KPI total.
pub async fn get_stats(
    State(state): State<AppState>,
    query: Result<Query<LeadFilter>, QueryRejection>,
) -> ApiResult<Dashboard> {
    let filter = lead_filter(query)?;
    let book = state.repo.list_all().await?;
    success(stats::dashboard(&book, filter, Utc::now()))
}

/// GET /api/catalog - Managers, sources, statuses and periods with labels.
pub async fn get_catalog() -> ApiResult<Catalog> {
    success(Catalog::build())
}
