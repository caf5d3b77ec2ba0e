// src/models/species.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'species' table in the database.
///
/// One row backs both quiz variants: the call recording is derived from the
/// Latin name, photographs come from the two image pools.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Species {
    pub id: i64,

    /// Serbian common name. Unique; used as the display/answer key.
    pub name_local: String,

    /// Latin name, shown as secondary text and used to derive the audio URL.
    pub name_latin: String,

    /// Taxonomic group, used to bias distractor selection toward
    /// plausible confusions.
    pub group_id: i32,

    /// Image file keys used for practice quizzes. Stored as a JSON array.
    pub images_practice: Json<Vec<String>>,

    /// Image file keys reserved for the official test.
    pub images_test: Json<Vec<String>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a new species entry.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSpeciesRequest {
    #[validate(length(min = 1, max = 100))]
    pub name_local: String,
    #[validate(length(min = 1, max = 100))]
    pub name_latin: String,
    pub group_id: i32,
    #[serde(default)]
    pub images_practice: Vec<String>,
    #[serde(default)]
    pub images_test: Vec<String>,
}

/// DTO for updating a species entry. Fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateSpeciesRequest {
    pub name_local: Option<String>,
    pub name_latin: Option<String>,
    pub group_id: Option<i32>,
    pub images_practice: Option<Vec<String>>,
    pub images_test: Option<Vec<String>>,
}
