//! Authentication endpoints: register, login, verify.

use axum::{extract::State, http::StatusCode, Json};

use super::{AuthResponse, VerifyResponse};
use crate::auth::{self, CurrentUser};
use crate::errors::AppError;
use crate::models::{LoginRequest, RegisterRequest, Role};
use crate::AppState;

/// POST /api/auth/register - Create a user and issue a token.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if !request.email.contains('@') {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if request.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if request.organization.trim().is_empty() {
        return Err(AppError::Validation("Organization is required".to_string()));
    }
    if Role::from_str(&request.role).is_none() {
        return Err(AppError::Validation(format!(
            "Unknown role: {}",
            request.role
        )));
    }

    if state
        .repo
        .find_user_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = auth::hash_password(&request.password)?;
    let user = state.repo.create_user(&request, &password_hash).await?;
    let token = auth::create_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)?;

    tracing::info!(user_id = %user.id, role = %user.role.as_str(), "Registered new user");

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /api/auth/login - Exchange email+password for a token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state
        .repo
        .find_user_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if !auth::verify_password(&request.password, &user.password_hash) {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = auth::create_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)?;

    Ok(Json(AuthResponse { token, user }))
}

/// GET /api/auth/verify - Resolve the bearer token to the stored user.
pub async fn verify(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<VerifyResponse>, AppError> {
    let user = state
        .repo
        .get_user(&current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

    Ok(Json(VerifyResponse { user }))
}
