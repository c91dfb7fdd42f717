//! FoodShare Backend
//!
//! REST backend for the FoodShare donation coordination platform: donors list
//! surplus food, recipients browse and claim it, admins oversee users and
//! listings, analysts read aggregated metrics.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting FoodShare Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if the signing secret was not configured
    if config.jwt_secret == config::DEV_JWT_SECRET {
        tracing::warn!("No FOODSHARE_JWT_SECRET configured. Using the development secret!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration: explicit allow-list when configured, open otherwise
    let cors = match &state.config.cors_origins {
        Some(origins) => {
            let parsed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    // Clone the signing secret for the auth layer
    let secret = state.config.jwt_secret.clone();

    // Routes requiring a bearer token
    let protected_routes = Router::new()
        // Auth
        .route("/auth/verify", get(api::verify))
        // Donations
        .route("/donations", get(api::list_donations))
        .route("/donations", post(api::create_donation))
        .route("/donations/available", get(api::list_available_donations))
        .route("/donations/donor/{id}", get(api::list_donations_by_donor))
        .route("/donations/{id}", put(api::update_donation))
        .route("/donations/{id}", delete(api::delete_donation))
        .route("/donations/{id}/claim", post(api::claim_donation))
        // Requests
        .route("/requests", get(api::list_requests))
        .route("/requests", post(api::create_request))
        .route(
            "/requests/recipient/{id}",
            get(api::list_requests_by_recipient),
        )
        .route("/requests/{id}", put(api::update_request))
        .route("/requests/{id}", delete(api::delete_request))
        // Donation history
        .route("/donation-history", get(api::list_history))
        .route("/donation-history", post(api::create_history))
        .route("/donation-history/donor/{id}", get(api::list_history_by_donor))
        // Users
        .route("/users", get(api::list_users))
        .route("/users/{id}", get(api::get_user))
        .route("/users/{id}", put(api::update_user))
        .route("/users/{id}", delete(api::delete_user))
        // Analytics
        .route("/analytics/summary", get(api::analytics_summary))
        // Apply bearer-token auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::jwt_auth_layer(secret.clone(), req, next)
        }));

    // Registration, login, and liveness need no credential
    let public_routes = Router::new()
        .route("/auth/register", post(api::register))
        .route("/auth/login", post(api::login))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness response body.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server is running",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests;
