//! REST API module.
//!
//! Contains all routes and handlers behind the `/api` prefix. Handlers return
//! stored documents directly; failures map to the uniform error body via
//! [`crate::errors::AppError`].

mod analytics;
mod auth;
mod donations;
mod history;
mod requests;
mod users;

pub use analytics::*;
pub use auth::*;
pub use donations::*;
pub use history::*;
pub use requests::*;
pub use users::*;

use serde::{Deserialize, Serialize};

use crate::models::{DonationHistory, FoodRequest, User};

/// Response body for successful register/login calls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Response body for GET /api/auth/verify.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub user: User,
}

/// Response body for a successful claim: the audit entry plus the completed
/// request written in the same transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub history: DonationHistory,
    pub request: FoodRequest,
}

/// Plain confirmation body for delete operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
