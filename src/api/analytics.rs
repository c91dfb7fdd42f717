//! Aggregated metrics endpoint backing the analyst and admin dashboards.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::AnalyticsSummary;
use crate::AppState;

/// GET /api/analytics/summary - Platform-wide totals and breakdowns.
pub async fn analytics_summary(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsSummary>, AppError> {
    Ok(Json(state.repo.analytics_summary().await?))
}
