//! Aggregated platform metrics served to the analyst and admin dashboards.

use serde::Serialize;

/// Donation volume for a single category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: String,
    pub count: i64,
    pub total_weight: f64,
}

/// Donation count for a single status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub status: String,
    pub count: i64,
}

/// Platform-wide summary computed from the four collections.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_users: i64,
    pub total_donations: i64,
    pub available_donations: i64,
    pub total_requests: i64,
    pub total_transfers: i64,
    /// Sum of weights over the donation history, in the listing units.
    pub total_weight_donated: f64,
    pub donations_by_category: Vec<CategoryBreakdown>,
    pub donations_by_status: Vec<StatusBreakdown>,
}
