// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Countdown per question, in seconds.
pub const COUNTDOWN_SECONDS: u32 = 30;

/// Delay after an answer is finalized, during which feedback is shown
/// before the session auto-advances.
pub const SETTLE_DELAY_MS: u64 = 2500;

/// Minimum number of distinct species needed to form one question
/// with plausible distractors.
pub const MIN_CATALOG_SIZE: usize = 4;

/// Fixed length of the official test.
pub const OFFICIAL_TEST_SIZE: usize = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    /// Public base URL of the object store holding call recordings and photos.
    pub storage_base_url: String,
    pub rust_log: String,
    /// Email seeded into the whitelist with the 'admin' role on startup.
    pub admin_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let storage_base_url = env::var("STORAGE_BASE_URL").expect("STORAGE_BASE_URL must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let admin_email = env::var("ADMIN_EMAIL").ok();

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            storage_base_url,
            rust_log,
            admin_email,
        }
    }
}
