// src/handlers/catalog.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{error::AppError, models::species::Species};

const SPECIES_COLUMNS: &str =
    "id, name_local, name_latin, group_id, images_practice, images_test, created_at";

/// Lists the full species catalog, ordered by common name. Backs the
/// preview screens and the admin catalog editor.
pub async fn list_species(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let species: Vec<Species> = sqlx::query_as(&format!(
        "SELECT {} FROM species ORDER BY name_local",
        SPECIES_COLUMNS
    ))
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list species: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(species))
}

/// Fetches a single species entry by ID.
pub async fn get_species(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let species: Option<Species> = sqlx::query_as(&format!(
        "SELECT {} FROM species WHERE id = $1",
        SPECIES_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch species {}: {:?}", id, e);
        AppError::InternalServerError(e.to_string())
    })?;

    let species = species.ok_or(AppError::NotFound("Species not found".to_string()))?;

    Ok(Json(species))
}
