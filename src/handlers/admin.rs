// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        allowed_user::{AllowedUser, AuthUser, CreateAllowedUserRequest},
        result::AnalyticsRow,
        settings::{OfficialTestWindow, load_official_window, store_official_window},
        species::{CreateSpeciesRequest, UpdateSpeciesRequest},
    },
};

/// Lists the whitelist.
/// Admin only.
pub async fn list_allowed_users(
    State(pool): State<PgPool>,
) -> Result<impl IntoResponse, AppError> {
    let users: Vec<AllowedUser> =
        sqlx::query_as("SELECT email, role, created_at FROM allowed_users ORDER BY email")
            .fetch_all(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list allowed users: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

    Ok(Json(users))
}

/// Adds an email to the whitelist.
/// Admin only.
pub async fn create_allowed_user(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateAllowedUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let role = payload.role.unwrap_or_else(|| "user".to_string());
    if role != "user" && role != "admin" {
        return Err(AppError::BadRequest(
            "Role must be 'user' or 'admin'".to_string(),
        ));
    }

    sqlx::query("INSERT INTO allowed_users (email, role) VALUES ($1, $2)")
        .bind(&payload.email)
        .bind(&role)
        .execute(&pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
                AppError::Conflict(format!("'{}' is already whitelisted", payload.email))
            } else {
                tracing::error!("Failed to whitelist {}: {:?}", payload.email, e);
                AppError::InternalServerError(e.to_string())
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"email": payload.email, "role": role})),
    ))
}

/// Removes an email from the whitelist.
/// Admin only. Prevents removing yourself.
pub async fn delete_allowed_user(
    State(pool): State<PgPool>,
    Extension(admin): Extension<AuthUser>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if email == admin.email {
        return Err(AppError::BadRequest(
            "Cannot remove yourself from the whitelist".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM allowed_users WHERE email = $1")
        .bind(&email)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to remove {} from whitelist: {:?}", email, e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Email not on the whitelist".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the official test window.
/// Admin only (users see a derived status via the quiz routes).
pub async fn get_official_window(
    State(pool): State<PgPool>,
) -> Result<impl IntoResponse, AppError> {
    let window = load_official_window(&pool).await?;
    Ok(Json(window))
}

/// DTO for updating the official test window.
#[derive(Debug, Deserialize)]
pub struct UpdateOfficialWindowRequest {
    pub active: bool,
    pub start: Option<chrono::DateTime<chrono::Utc>>,
    pub end: Option<chrono::DateTime<chrono::Utc>>,
}

/// Replaces the official test window.
/// Admin only.
pub async fn put_official_window(
    State(pool): State<PgPool>,
    Json(payload): Json<UpdateOfficialWindowRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let (Some(start), Some(end)) = (payload.start, payload.end)
        && start > end
    {
        return Err(AppError::BadRequest(
            "Window start must not be after its end".to_string(),
        ));
    }

    let window = OfficialTestWindow {
        active: payload.active,
        start: payload.start,
        end: payload.end,
    };
    store_official_window(&pool, &window).await.map_err(|e| {
        tracing::error!("Failed to store official test window: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(window))
}

/// Creates a new species entry.
/// Admin only.
pub async fn create_species(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateSpeciesRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO species (name_local, name_latin, group_id, images_practice, images_test)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&payload.name_local)
    .bind(&payload.name_latin)
    .bind(payload.group_id)
    .bind(SqlJson(&payload.images_practice))
    .bind(SqlJson(&payload.images_test))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
            AppError::Conflict(format!("Species '{}' already exists", payload.name_local))
        } else {
            tracing::error!("Failed to create species: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Updates a species entry by ID.
/// Admin only.
pub async fn update_species(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSpeciesRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name_local.is_none()
        && payload.name_latin.is_none()
        && payload.group_id.is_none()
        && payload.images_practice.is_none()
        && payload.images_test.is_none()
    {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE species SET ");
    let mut separated = builder.separated(", ");

    if let Some(name_local) = payload.name_local {
        separated.push("name_local = ");
        separated.push_bind_unseparated(name_local);
    }

    if let Some(name_latin) = payload.name_latin {
        separated.push("name_latin = ");
        separated.push_bind_unseparated(name_latin);
    }

    if let Some(group_id) = payload.group_id {
        separated.push("group_id = ");
        separated.push_bind_unseparated(group_id);
    }

    if let Some(images_practice) = payload.images_practice {
        separated.push("images_practice = ");
        separated.push_bind_unseparated(SqlJson(images_practice));
    }

    if let Some(images_test) = payload.images_test {
        separated.push("images_test = ");
        separated.push_bind_unseparated(SqlJson(images_test));
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update species {}: {:?}", id, e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Species not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a species entry by ID.
/// Admin only.
pub async fn delete_species(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM species WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete species {}: {:?}", id, e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Species not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Aggregate result analytics grouped by quiz type and official flag.
/// Admin only.
pub async fn analytics(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<AnalyticsRow> = sqlx::query_as(
        r#"
        SELECT
            quiz_type,
            is_official,
            COUNT(*) AS results_count,
            AVG(total_points::float8) AS average_points,
            MAX(total_points) AS best_points
        FROM quiz_results
        GROUP BY quiz_type, is_official
        ORDER BY quiz_type, is_official
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to compute analytics: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(rows))
}
