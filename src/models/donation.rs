//! Donation model and request bodies.

use serde::{Deserialize, Serialize};

/// Closed set of food categories a donation can be listed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Vegetables,
    Fruits,
    Dairy,
    Bakery,
    #[serde(rename = "Prepared Food")]
    PreparedFood,
    #[serde(rename = "Canned Goods")]
    CannedGoods,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vegetables => "Vegetables",
            Category::Fruits => "Fruits",
            Category::Dairy => "Dairy",
            Category::Bakery => "Bakery",
            Category::PreparedFood => "Prepared Food",
            Category::CannedGoods => "Canned Goods",
            Category::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Vegetables" => Some(Category::Vegetables),
            "Fruits" => Some(Category::Fruits),
            "Dairy" => Some(Category::Dairy),
            "Bakery" => Some(Category::Bakery),
            "Prepared Food" => Some(Category::PreparedFood),
            "Canned Goods" => Some(Category::CannedGoods),
            "Other" => Some(Category::Other),
            _ => None,
        }
    }
}

/// Donation lifecycle status. Set directly by callers via PUT; the claim
/// endpoint retires an available donation into history instead of
/// transitioning it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Available,
    Pending,
    Completed,
    Cancelled,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Available => "available",
            DonationStatus::Pending => "pending",
            DonationStatus::Completed => "completed",
            DonationStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(DonationStatus::Available),
            "pending" => Some(DonationStatus::Pending),
            "completed" => Some(DonationStatus::Completed),
            "cancelled" => Some(DonationStatus::Cancelled),
            _ => None,
        }
    }
}

/// A listed surplus-food offer from a donor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub donor_id: String,
    pub donor_name: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub weight: f64,
    pub unit: String,
    pub expiry_date: String,
    pub pickup_location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    pub status: DonationStatus,
    /// Request ids recorded against this donation. Back-references are not
    /// cleaned up when the donation is deleted.
    pub matches: Vec<String>,
    pub created_at: String,
}

/// Request body for creating a new donation.
///
/// The donor id and name come from the authenticated caller, never from the
/// payload. Enum-valued fields arrive as strings and are validated against
/// their domain before anything is written.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub weight: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub expiry_date: String,
    pub pickup_location: String,
    #[serde(default)]
    pub pickup_time: Option<String>,
}

pub fn default_unit() -> String {
    "kg".to_string()
}

/// Request body for updating an existing donation. Fields absent from the
/// payload keep their stored values.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDonationRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub pickup_location: Option<String>,
    #[serde(default)]
    pub pickup_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub matches: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for name in [
            "Vegetables",
            "Fruits",
            "Dairy",
            "Bakery",
            "Prepared Food",
            "Canned Goods",
            "Other",
        ] {
            assert_eq!(Category::from_str(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn test_category_rejects_unknown() {
        assert!(Category::from_str("Beverages").is_none());
        assert!(Category::from_str("vegetables").is_none());
    }

    #[test]
    fn test_status_round_trip() {
        for name in ["available", "pending", "completed", "cancelled"] {
            assert_eq!(DonationStatus::from_str(name).unwrap().as_str(), name);
        }
        assert!(DonationStatus::from_str("claimed").is_none());
    }
}
