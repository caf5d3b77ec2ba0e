// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{error::AppError, models::allowed_user::AllowedUser, utils::jwt::Claims};

/// Returns the caller's authorization status.
///
/// Runs behind token verification only, not the whitelist, so a signed-in
/// but unauthorized user gets a proper message instead of a bare 403.
pub async fn me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let entry: Option<AllowedUser> =
        sqlx::query_as("SELECT email, role, created_at FROM allowed_users WHERE email = $1")
            .bind(&claims.sub)
            .fetch_optional(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check authorization for {}: {:?}", claims.sub, e);
                AppError::InternalServerError(e.to_string())
            })?;

    let body = match entry {
        Some(user) => serde_json::json!({
            "email": user.email,
            "authorized": true,
            "role": user.role,
            "message": null,
        }),
        None => serde_json::json!({
            "email": claims.sub,
            "authorized": false,
            "role": null,
            "message": format!(
                "Your email address ({}) is not on the list of allowed users. Contact the administrator for access.",
                claims.sub
            ),
        }),
    };

    Ok(Json(body))
}
