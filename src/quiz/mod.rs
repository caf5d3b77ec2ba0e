// src/quiz/mod.rs

pub mod driver;
pub mod generator;
pub mod media;
pub mod registry;
pub mod score;
pub mod session;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::species::Species;

/// The two quiz variants: identify a bird by its call or by a photograph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizType {
    Audio,
    Image,
}

impl QuizType {
    /// Nominal number of answer options presented for this variant.
    pub fn option_target(&self) -> usize {
        match self {
            QuizType::Audio => 4,
            QuizType::Image => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuizType::Audio => "audio",
            QuizType::Image => "image",
        }
    }
}

/// Errors raised by the quiz core (generation and session transitions).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("catalog has only {available} distinct species, {needed} are needed")]
    CatalogInsufficient { available: usize, needed: usize },

    #[error("species {0} is not an option for the current question")]
    InvalidChoice(i64),

    #[error("the current question has already been finalized")]
    AlreadyFinalized,

    #[error("the current question has not been answered yet")]
    NotAnswered,

    #[error("the quiz session is finished and accepts no further input")]
    Finished,
}

/// One answer option as presented to the user. Carries the species identity
/// for grading and both names for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: i64,
    pub name_local: String,
    pub name_latin: String,
}

impl From<&Species> for AnswerOption {
    fn from(s: &Species) -> Self {
        AnswerOption {
            id: s.id,
            name_local: s.name_local.clone(),
            name_latin: s.name_latin.clone(),
        }
    }
}

/// Resolved media for one question. An empty URL means no media was
/// available for the selected pool; the client renders a placeholder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
    pub author: Option<String>,
}

/// One generated question: a designated correct species, the shuffled option
/// set (always containing the correct species) and the resolved media.
/// Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub correct: AnswerOption,
    pub options: Vec<AnswerOption>,
    pub media: MediaRef,
}
