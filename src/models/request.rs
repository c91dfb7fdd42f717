//! Food request model and request bodies.
//!
//! A `FoodRequest` is either a recipient's open ask for food or, when created
//! by the claim workflow, the record of a fulfilled claim.

use serde::{Deserialize, Serialize};

/// Urgency of a recipient's request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Urgency::Low),
            "medium" => Some(Urgency::Medium),
            "high" => Some(Urgency::High),
            _ => None,
        }
    }
}

/// Request lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Matched,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Matched => "matched",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "matched" => Some(RequestStatus::Matched),
            "completed" => Some(RequestStatus::Completed),
            "cancelled" => Some(RequestStatus::Cancelled),
            _ => None,
        }
    }
}

/// A recipient's ask for food.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRequest {
    pub id: String,
    pub recipient_id: String,
    pub recipient_name: String,
    pub title: String,
    pub description: String,
    /// Free-form category preferences, unlike the closed donation enum.
    pub categories: Vec<String>,
    pub quantity: f64,
    pub unit: String,
    pub urgency: Urgency,
    pub pickup_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    pub status: RequestStatus,
    pub created_at: String,
}

/// Request body for creating a new food request. The recipient id and name
/// come from the authenticated caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodRequestRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub quantity: f64,
    #[serde(default = "super::donation::default_unit")]
    pub unit: String,
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default)]
    pub pickup_available: Option<bool>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for updating an existing food request. Fields absent from the
/// payload keep their stored values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFoodRequestRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default)]
    pub pickup_available: Option<bool>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
