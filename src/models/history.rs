//! Donation history model.
//!
//! The history collection is an append-only audit trail of completed
//! donor-to-recipient transfers. There are no update or delete routes for it.

use serde::{Deserialize, Serialize};

/// Status of a recorded transfer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Donated,
    Completed,
}

impl HistoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryStatus::Donated => "donated",
            HistoryStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "donated" => Some(HistoryStatus::Donated),
            "completed" => Some(HistoryStatus::Completed),
            _ => None,
        }
    }
}

/// Record of a donor-to-recipient transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationHistory {
    pub id: String,
    pub donor_id: String,
    pub donor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub weight: f64,
    pub unit: String,
    pub pickup_location: String,
    pub donated_at: String,
    pub status: HistoryStatus,
}

/// Request body for appending a history entry directly.
///
/// The claim workflow writes history itself; this route exists for transfers
/// arranged outside the platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHistoryRequest {
    pub donor_id: String,
    pub donor_name: String,
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub recipient_name: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub weight: f64,
    #[serde(default = "super::donation::default_unit")]
    pub unit: String,
    pub pickup_location: String,
    #[serde(default)]
    pub status: Option<String>,
}
