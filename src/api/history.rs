//! Donation history endpoints. The history collection is append-only: list
//! and create, nothing else.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::models::{CreateHistoryRequest, DonationHistory};
use crate::AppState;

/// GET /api/donation-history - List the full donation history.
pub async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<DonationHistory>>, AppError> {
    Ok(Json(state.repo.list_history().await?))
}

/// GET /api/donation-history/donor/:id - List history entries for a donor.
pub async fn list_history_by_donor(
    State(state): State<AppState>,
    Path(donor_id): Path<String>,
) -> Result<Json<Vec<DonationHistory>>, AppError> {
    Ok(Json(state.repo.list_history_by_donor(&donor_id).await?))
}

/// POST /api/donation-history - Append a history entry for a transfer
/// arranged outside the claim workflow.
pub async fn create_history(
    State(state): State<AppState>,
    Json(request): Json<CreateHistoryRequest>,
) -> Result<(StatusCode, Json<DonationHistory>), AppError> {
    if request.donor_name.trim().is_empty() {
        return Err(AppError::Validation("Donor name is required".to_string()));
    }
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if request.description.trim().is_empty() {
        return Err(AppError::Validation("Description is required".to_string()));
    }
    if request.pickup_location.trim().is_empty() {
        return Err(AppError::Validation(
            "Pickup location is required".to_string(),
        ));
    }
    if !(request.weight > 0.0) {
        return Err(AppError::Validation(
            "Weight must be a positive number".to_string(),
        ));
    }

    let entry = state.repo.create_history(&request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
