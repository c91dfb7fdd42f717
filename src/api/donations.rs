//! Donation endpoints, including the transactional claim workflow.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{ClaimResponse, MessageResponse};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{CreateDonationRequest, Donation, Role, UpdateDonationRequest};
use crate::AppState;

/// GET /api/donations - List all donations.
pub async fn list_donations(State(state): State<AppState>) -> Result<Json<Vec<Donation>>, AppError> {
    Ok(Json(state.repo.list_donations().await?))
}

/// GET /api/donations/donor/:id - List donations owned by a donor.
pub async fn list_donations_by_donor(
    State(state): State<AppState>,
    Path(donor_id): Path<String>,
) -> Result<Json<Vec<Donation>>, AppError> {
    Ok(Json(state.repo.list_donations_by_donor(&donor_id).await?))
}

/// GET /api/donations/available - List donations open for claiming.
pub async fn list_available_donations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Donation>>, AppError> {
    Ok(Json(state.repo.list_available_donations().await?))
}

/// POST /api/donations - Create a new donation.
///
/// The donor identity comes from the bearer token, never from the payload.
pub async fn create_donation(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<CreateDonationRequest>,
) -> Result<(StatusCode, Json<Donation>), AppError> {
    validate_donation_fields(
        Some(&request.title),
        Some(&request.description),
        Some(&request.pickup_location),
        Some(request.weight),
        Some(&request.expiry_date),
    )?;

    let expiry = chrono::DateTime::parse_from_rfc3339(&request.expiry_date)
        .map_err(|_| AppError::Validation("expiryDate must be an RFC 3339 timestamp".to_string()))?;
    if expiry <= chrono::Utc::now() {
        return Err(AppError::Validation(
            "expiryDate must be in the future".to_string(),
        ));
    }

    let donor_name = display_name(&state, &current).await?;
    let donation = state
        .repo
        .create_donation(&current.id, &donor_name, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(donation)))
}

/// PUT /api/donations/:id - Update a donation. Fields absent from the payload
/// keep their stored values.
pub async fn update_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateDonationRequest>,
) -> Result<Json<Donation>, AppError> {
    validate_donation_fields(
        request.title.as_deref(),
        request.description.as_deref(),
        request.pickup_location.as_deref(),
        request.weight,
        request.expiry_date.as_deref(),
    )?;

    Ok(Json(state.repo.update_donation(&id, &request).await?))
}

/// DELETE /api/donations/:id - Delete a donation.
pub async fn delete_donation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete_donation(&id).await?;
    Ok(Json(MessageResponse::new("Donation deleted successfully")))
}

/// POST /api/donations/:id/claim - Claim an available donation.
///
/// The whole transfer (history entry, completed request, donation removal)
/// runs as one transaction; of two concurrent claims exactly one succeeds.
pub async fn claim_donation(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ClaimResponse>), AppError> {
    if current.role != Role::Recipient {
        return Err(AppError::Forbidden(
            "Only recipients can claim donations".to_string(),
        ));
    }

    let recipient_name = display_name(&state, &current).await?;
    let (history, request) = state
        .repo
        .claim_donation(&id, &current.id, &recipient_name)
        .await?;

    tracing::info!(donation = %id, recipient = %current.id, "Donation claimed");

    Ok((StatusCode::CREATED, Json(ClaimResponse { history, request })))
}

/// Shared field checks for create and update payloads. `None` means the field
/// is absent (allowed on update) and skips the check.
fn validate_donation_fields(
    title: Option<&str>,
    description: Option<&str>,
    pickup_location: Option<&str>,
    weight: Option<f64>,
    expiry_date: Option<&str>,
) -> Result<(), AppError> {
    if let Some(title) = title {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
    }
    if let Some(description) = description {
        if description.trim().is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }
    }
    if let Some(pickup_location) = pickup_location {
        if pickup_location.trim().is_empty() {
            return Err(AppError::Validation(
                "Pickup location is required".to_string(),
            ));
        }
    }
    if let Some(weight) = weight {
        if !(weight > 0.0) {
            return Err(AppError::Validation(
                "Weight must be a positive number".to_string(),
            ));
        }
    }
    if let Some(expiry_date) = expiry_date {
        if chrono::DateTime::parse_from_rfc3339(expiry_date).is_err() {
            return Err(AppError::Validation(
                "expiryDate must be an RFC 3339 timestamp".to_string(),
            ));
        }
    }
    Ok(())
}

/// Resolve the caller's public display name: organization when present,
/// otherwise the personal name.
pub(super) async fn display_name(
    state: &AppState,
    current: &CurrentUser,
) -> Result<String, AppError> {
    let user = state
        .repo
        .get_user(&current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

    if user.organization.trim().is_empty() {
        Ok(user.name)
    } else {
        Ok(user.organization)
    }
}
