// src/models/allowed_user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'allowed_users' table: the whitelist of email addresses
/// authorized to use the application. Identity itself comes from the
/// external provider; this table only gates access and assigns roles.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AllowedUser {
    pub email: String,

    /// 'user' or 'admin'.
    pub role: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// The authenticated, whitelisted caller. Injected into request extensions
/// by the whitelist middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// DTO for adding a whitelist entry.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAllowedUserRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    /// Defaults to 'user' when omitted.
    pub role: Option<String>,
}
