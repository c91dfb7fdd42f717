//! Food request endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::MessageResponse;
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{CreateFoodRequestRequest, FoodRequest, UpdateFoodRequestRequest};
use crate::AppState;

/// GET /api/requests - List all food requests.
pub async fn list_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<FoodRequest>>, AppError> {
    Ok(Json(state.repo.list_requests().await?))
}

/// GET /api/requests/recipient/:id - List requests owned by a recipient.
pub async fn list_requests_by_recipient(
    State(state): State<AppState>,
    Path(recipient_id): Path<String>,
) -> Result<Json<Vec<FoodRequest>>, AppError> {
    Ok(Json(
        state.repo.list_requests_by_recipient(&recipient_id).await?,
    ))
}

/// POST /api/requests - Create a new food request.
///
/// The recipient identity comes from the bearer token, never from the payload.
pub async fn create_request(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<CreateFoodRequestRequest>,
) -> Result<(StatusCode, Json<FoodRequest>), AppError> {
    validate_request_fields(
        Some(&request.title),
        Some(&request.description),
        Some(request.quantity),
    )?;

    let recipient_name = super::donations::display_name(&state, &current).await?;
    let created = state
        .repo
        .create_request(&current.id, &recipient_name, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/requests/:id - Update a food request. Fields absent from the
/// payload keep their stored values.
pub async fn update_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateFoodRequestRequest>,
) -> Result<Json<FoodRequest>, AppError> {
    validate_request_fields(
        request.title.as_deref(),
        request.description.as_deref(),
        request.quantity,
    )?;

    Ok(Json(state.repo.update_request(&id, &request).await?))
}

/// DELETE /api/requests/:id - Delete a food request.
pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete_request(&id).await?;
    Ok(Json(MessageResponse::new("Request deleted successfully")))
}

fn validate_request_fields(
    title: Option<&str>,
    description: Option<&str>,
    quantity: Option<f64>,
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
    if let Some(quantity) = quantity {
        if !(quantity > 0.0) {
            return Err(AppError::Validation(
                "Quantity must be a positive number".to_string(),
            ));
        }
    }
    Ok(())
}
