// src/quiz/score.rs

use serde::{Deserialize, Serialize};

use crate::quiz::{
    QuizType,
    session::{Attempt, SessionConfig},
};

/// Per-question line of the stored result breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownEntry {
    /// Display name of the asked species.
    pub question: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub points: i32,
}

/// Structured result of one completed session, ready for persistence and
/// for history display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub user_email: String,
    pub quiz_type: QuizType,
    pub is_official: bool,
    pub question_count: i32,
    pub total_points: i32,
    /// Percentage in [0, 100]; a net-negative run reports 0, not a
    /// negative rate.
    pub success_rate: i32,
    pub breakdown: Vec<BreakdownEntry>,
}

/// Reduces a completed attempt sequence into a total score and the record
/// to persist. Pure; persistence failures are the caller's concern.
pub fn aggregate(config: &SessionConfig, attempts: &[Attempt]) -> QuizOutcome {
    let total_points: i32 = attempts.iter().map(|a| a.points).sum();
    let count = attempts.len() as i32;

    let success_rate = if count == 0 {
        0
    } else {
        let rate = (100.0 * f64::from(total_points) / f64::from(count)).round() as i32;
        rate.max(0)
    };

    let breakdown = attempts
        .iter()
        .map(|a| BreakdownEntry {
            question: a.correct_answer.clone(),
            user_answer: a.user_answer.clone(),
            correct_answer: a.correct_answer.clone(),
            points: a.points,
        })
        .collect();

    QuizOutcome {
        user_email: config.user_email.clone(),
        quiz_type: config.quiz_type,
        is_official: config.official,
        question_count: count,
        total_points,
        success_rate,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::session::TimeoutPolicy;

    fn config() -> SessionConfig {
        SessionConfig {
            user_email: "test@example.com".to_string(),
            quiz_type: QuizType::Audio,
            official: false,
            timeout_policy: TimeoutPolicy::Graded,
        }
    }

    fn attempt(points: i32, user_answer: Option<&str>) -> Attempt {
        Attempt {
            correct_answer: "kos".to_string(),
            user_answer: user_answer.map(str::to_string),
            is_correct: points > 0,
            points,
        }
    }

    #[test]
    fn total_is_the_sum_of_attempt_points() {
        let attempts = vec![
            attempt(1, Some("kos")),
            attempt(-1, Some("velika senica")),
            attempt(0, None),
            attempt(1, Some("kos")),
        ];
        let outcome = aggregate(&config(), &attempts);
        assert_eq!(outcome.total_points, 1);
        assert_eq!(outcome.question_count, 4);
        assert_eq!(outcome.success_rate, 25);
        assert_eq!(outcome.breakdown.len(), 4);
        assert_eq!(outcome.breakdown[1].user_answer.as_deref(), Some("velika senica"));
    }

    #[test]
    fn net_negative_runs_report_zero_rate() {
        let attempts = vec![attempt(-1, Some("x")), attempt(-1, Some("y")), attempt(0, None)];
        let outcome = aggregate(&config(), &attempts);
        assert_eq!(outcome.total_points, -2);
        assert_eq!(outcome.success_rate, 0);
    }

    #[test]
    fn rate_rounds_to_nearest_percent() {
        let attempts = vec![attempt(1, Some("kos")), attempt(0, None), attempt(0, None)];
        // 1/3 => 33.33 => 33
        assert_eq!(aggregate(&config(), &attempts).success_rate, 33);

        let attempts = vec![
            attempt(1, Some("kos")),
            attempt(1, Some("kos")),
            attempt(0, None),
        ];
        // 2/3 => 66.67 => 67
        assert_eq!(aggregate(&config(), &attempts).success_rate, 67);
    }

    #[test]
    fn perfect_run_is_one_hundred_percent() {
        let attempts = vec![attempt(1, Some("kos")); 10];
        let outcome = aggregate(&config(), &attempts);
        assert_eq!(outcome.total_points, 10);
        assert_eq!(outcome.success_rate, 100);
    }

    #[test]
    fn empty_attempt_list_reports_zero() {
        let outcome = aggregate(&config(), &[]);
        assert_eq!(outcome.question_count, 0);
        assert_eq!(outcome.total_points, 0);
        assert_eq!(outcome.success_rate, 0);
    }
}
