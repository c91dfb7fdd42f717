//! Configuration module for the FoodShare backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Fallback signing secret for local development only.
pub const DEV_JWT_SECRET: &str = "foodshare-dev-secret";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Secret used to sign and verify bearer tokens
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub token_ttl_hours: i64,
    /// Allowed CORS origins; None allows any origin (dev mode)
    pub cors_origins: Option<Vec<String>>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("FOODSHARE_DB_PATH")
            .unwrap_or_else(|_| "./data/foodshare.sqlite".to_string())
            .into();

        let bind_addr = env::var("FOODSHARE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .expect("Invalid FOODSHARE_BIND_ADDR format");

        let jwt_secret =
            env::var("FOODSHARE_JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());

        let token_ttl_hours = env::var("FOODSHARE_TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);

        let cors_origins = env::var("FOODSHARE_CORS_ORIGINS").ok().map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let log_level = env::var("FOODSHARE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            db_path,
            bind_addr,
            jwt_secret,
            token_ttl_hours,
            cors_origins,
            log_level,
        }
    }
}
