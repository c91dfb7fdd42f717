//! User management endpoints. Listing and deletion are admin-only; a user may
//! update their own profile.

use axum::{
    extract::{Path, State},
    Json,
};

use super::MessageResponse;
use crate::auth::{CurrentUser, RequireAdmin};
use crate::errors::AppError;
use crate::models::{Role, UpdateUserRequest, User};
use crate::AppState;

/// GET /api/users - List all users (admin only).
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.repo.list_users().await?))
}

/// GET /api/users/:id - Get a single user.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = state
        .repo
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(user))
}

/// PUT /api/users/:id - Update a user's profile (self or admin).
pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    if current.id != id && current.role != Role::Admin {
        return Err(AppError::Forbidden(
            "Cannot update another user's profile".to_string(),
        ));
    }
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }
    }

    Ok(Json(state.repo.update_user(&id, &request).await?))
}

/// DELETE /api/users/:id - Delete a user (admin only).
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete_user(&id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
