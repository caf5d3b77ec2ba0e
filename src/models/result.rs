// src/models/result.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

use crate::quiz::score::BreakdownEntry;

/// Represents the 'quiz_results' table: one row per completed quiz session.
/// Written exactly once at session completion, never mutated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    pub user_email: String,
    pub question_count: i32,
    pub total_points: i32,
    pub is_official: bool,

    /// 'audio' or 'image'.
    pub quiz_type: String,

    /// Per-question breakdown, stored as a JSON array.
    pub breakdown: Json<Vec<BreakdownEntry>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Aggregated analytics row: result counts and averages grouped by quiz
/// type and official flag.
#[derive(Debug, Serialize, FromRow)]
pub struct AnalyticsRow {
    pub quiz_type: String,
    pub is_official: bool,
    pub results_count: i64,
    pub average_points: Option<f64>,
    pub best_points: Option<i32>,
}
