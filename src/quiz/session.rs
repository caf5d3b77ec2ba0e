// src/quiz/session.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::COUNTDOWN_SECONDS,
    quiz::{Question, QuizError, QuizType},
};

/// What the timer does to a question that runs out:
///
/// * `Graded` scores the last tentative selection normally (the sentinel
///   scores 0), the same as an explicit skip.
/// * `Forfeit` locks in whatever was selected at the instant of timeout with
///   0 points even when it is correct; the user did not affirmatively submit
///   in time.
///
/// Both behaviors exist in the field; they are deliberately kept distinct
/// rather than unified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutPolicy {
    #[default]
    Graded,
    Forfeit,
}

/// A tentative selection: a concrete species or the "don't know" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerChoice {
    Species(i64),
    DontKnow,
}

/// Per-session configuration, passed in explicitly at construction instead
/// of being read from ambient process-wide state.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub user_email: String,
    pub quiz_type: QuizType,
    pub official: bool,
    pub timeout_policy: TimeoutPolicy,
}

/// The finalized, scored answer record for one question. Created exactly
/// once, by the first finalizing trigger; never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Attempt {
    /// Display name of the correct species.
    pub correct_answer: String,
    /// Display name the user committed, or None for "don't know"/timeout.
    pub user_answer: Option<String>,
    pub is_correct: bool,
    /// +1 correct, -1 incorrect, 0 for "don't know" or a forfeited timeout.
    pub points: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum Phase {
    AwaitingAnswer { countdown: u32 },
    Answered,
    Finished,
}

/// One live quiz run: the question sequence, the current position, the
/// accumulated attempts and the countdown. The AwaitingAnswer -> Answered
/// transition is a one-time latch per question; whichever trigger (skip or
/// timer) fires first wins, the other becomes an error.
#[derive(Debug)]
pub struct QuizSession {
    id: Uuid,
    config: SessionConfig,
    questions: Vec<Question>,
    attempts: Vec<Attempt>,
    index: usize,
    phase: Phase,
    tentative: Option<AnswerChoice>,
    /// Monotonic latch guarding the single persistence call.
    completed_taken: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>, config: SessionConfig) -> Self {
        debug_assert!(!questions.is_empty());
        QuizSession {
            id: Uuid::new_v4(),
            config,
            questions,
            attempts: Vec::new(),
            index: 0,
            phase: Phase::AwaitingAnswer {
                countdown: COUNTDOWN_SECONDS,
            },
            tentative: None,
            completed_taken: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.index]
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn tentative(&self) -> Option<AnswerChoice> {
        self.tentative
    }

    /// Running score: sum of attempt points so far.
    pub fn score(&self) -> i32 {
        self.attempts.iter().map(|a| a.points).sum()
    }

    /// Records a tentative selection. May be repeated any number of times
    /// before finalization; no attempt is created. The species must be one
    /// of the current question's options.
    pub fn select(&mut self, choice: AnswerChoice) -> Result<(), QuizError> {
        match self.phase {
            Phase::AwaitingAnswer { .. } => {
                if let AnswerChoice::Species(id) = choice
                    && !self.current_question().options.iter().any(|o| o.id == id)
                {
                    return Err(QuizError::InvalidChoice(id));
                }
                self.tentative = Some(choice);
                Ok(())
            }
            Phase::Answered => Err(QuizError::AlreadyFinalized),
            Phase::Finished => Err(QuizError::Finished),
        }
    }

    /// Explicit skip: finalizes the current question with standard scoring
    /// using the last tentative selection, or "don't know" if there is none.
    pub fn skip(&mut self) -> Result<&Attempt, QuizError> {
        match self.phase {
            Phase::AwaitingAnswer { .. } => Ok(self.finalize_graded()),
            Phase::Answered => Err(QuizError::AlreadyFinalized),
            Phase::Finished => Err(QuizError::Finished),
        }
    }

    /// One countdown step. At zero the question is finalized according to
    /// the session's timeout policy. Ticks outside AwaitingAnswer are no-ops
    /// so a stale timer firing after a skip cannot double-finalize.
    pub fn tick(&mut self) -> Phase {
        if let Phase::AwaitingAnswer { countdown } = self.phase {
            let remaining = countdown.saturating_sub(1);
            if remaining == 0 {
                match self.config.timeout_policy {
                    TimeoutPolicy::Graded => {
                        self.finalize_graded();
                    }
                    TimeoutPolicy::Forfeit => {
                        self.finalize_forfeit();
                    }
                }
            } else {
                self.phase = Phase::AwaitingAnswer {
                    countdown: remaining,
                };
            }
        }
        self.phase
    }

    /// Leaves the settle period: moves to the next question with a fresh
    /// countdown, or to Finished after the last one.
    pub fn advance(&mut self) -> Result<Phase, QuizError> {
        match self.phase {
            Phase::Answered => {
                if self.index + 1 == self.questions.len() {
                    self.phase = Phase::Finished;
                } else {
                    self.index += 1;
                    self.tentative = None;
                    self.phase = Phase::AwaitingAnswer {
                        countdown: COUNTDOWN_SECONDS,
                    };
                }
                Ok(self.phase)
            }
            Phase::AwaitingAnswer { .. } => Err(QuizError::NotAnswered),
            Phase::Finished => Err(QuizError::Finished),
        }
    }

    /// Abandons the session: terminal, nothing is persisted.
    pub fn abort(&mut self) {
        self.phase = Phase::Finished;
        self.completed_taken = true;
    }

    /// Hands out the completed attempt list exactly once, and only for a
    /// session that ran to completion. Guards the persistence call against
    /// duplicate completion signals.
    pub fn take_completed(&mut self) -> Option<Vec<Attempt>> {
        if self.phase == Phase::Finished
            && !self.completed_taken
            && self.attempts.len() == self.questions.len()
        {
            self.completed_taken = true;
            Some(self.attempts.clone())
        } else {
            None
        }
    }

    /// Standard scoring: +1 correct, -1 incorrect, 0 for "don't know".
    /// Correctness compares species identity, not display names.
    fn finalize_graded(&mut self) -> &Attempt {
        let question = &self.questions[self.index];
        let attempt = match self.tentative {
            Some(AnswerChoice::Species(id)) => {
                let is_correct = id == question.correct.id;
                let user_answer = question
                    .options
                    .iter()
                    .find(|o| o.id == id)
                    .map(|o| o.name_local.clone());
                Attempt {
                    correct_answer: question.correct.name_local.clone(),
                    user_answer,
                    is_correct,
                    points: if is_correct { 1 } else { -1 },
                }
            }
            Some(AnswerChoice::DontKnow) | None => Attempt {
                correct_answer: question.correct.name_local.clone(),
                user_answer: None,
                is_correct: false,
                points: 0,
            },
        };
        self.push_attempt(attempt)
    }

    /// Forfeit scoring: the selection present at the instant of timeout is
    /// locked in with 0 points regardless of correctness, and no answer is
    /// recorded against the user.
    fn finalize_forfeit(&mut self) -> &Attempt {
        let question = &self.questions[self.index];
        let is_correct = matches!(
            self.tentative,
            Some(AnswerChoice::Species(id)) if id == question.correct.id
        );
        let attempt = Attempt {
            correct_answer: question.correct.name_local.clone(),
            user_answer: None,
            is_correct,
            points: 0,
        };
        self.push_attempt(attempt)
    }

    fn push_attempt(&mut self, attempt: Attempt) -> &Attempt {
        self.attempts.push(attempt);
        self.phase = Phase::Answered;
        self.attempts.last().expect("attempt was just pushed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{AnswerOption, MediaRef};

    fn option(id: i64, name: &str) -> AnswerOption {
        AnswerOption {
            id,
            name_local: name.to_string(),
            name_latin: format!("Latinus {}", name),
        }
    }

    fn question(correct_id: i64) -> Question {
        Question {
            correct: option(correct_id, &format!("bird-{}", correct_id)),
            options: (1..=4).map(|i| option(i, &format!("bird-{}", i))).collect(),
            media: MediaRef::default(),
        }
    }

    fn session(n: usize, policy: TimeoutPolicy) -> QuizSession {
        let questions = (0..n).map(|i| question((i % 4) as i64 + 1)).collect();
        QuizSession::new(
            questions,
            SessionConfig {
                user_email: "test@example.com".to_string(),
                quiz_type: QuizType::Audio,
                official: false,
                timeout_policy: policy,
            },
        )
    }

    fn run_out_the_clock(s: &mut QuizSession) {
        for _ in 0..COUNTDOWN_SECONDS {
            if !matches!(s.phase(), Phase::AwaitingAnswer { .. }) {
                break;
            }
            s.tick();
        }
    }

    #[test]
    fn starts_awaiting_with_full_countdown() {
        let s = session(3, TimeoutPolicy::Graded);
        assert_eq!(s.index(), 0);
        assert_eq!(
            s.phase(),
            Phase::AwaitingAnswer {
                countdown: COUNTDOWN_SECONDS
            }
        );
        assert!(s.attempts().is_empty());
    }

    #[test]
    fn correct_selection_scores_plus_one() {
        let mut s = session(3, TimeoutPolicy::Graded);
        let correct_id = s.current_question().correct.id;
        s.select(AnswerChoice::Species(correct_id)).unwrap();
        let attempt = s.skip().unwrap();
        assert!(attempt.is_correct);
        assert_eq!(attempt.points, 1);
        assert_eq!(attempt.user_answer.as_deref(), Some("bird-1"));
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn skip_with_wrong_tentative_scores_minus_one() {
        let mut s = session(3, TimeoutPolicy::Graded);
        let wrong_id = s
            .current_question()
            .options
            .iter()
            .find(|o| o.id != s.current_question().correct.id)
            .unwrap()
            .id;
        s.select(AnswerChoice::Species(wrong_id)).unwrap();
        let attempt = s.skip().unwrap();
        assert!(!attempt.is_correct);
        assert_eq!(attempt.points, -1);
        assert!(attempt.user_answer.is_some());
    }

    #[test]
    fn skip_without_selection_is_dont_know() {
        let mut s = session(3, TimeoutPolicy::Graded);
        let attempt = s.skip().unwrap();
        assert_eq!(attempt.points, 0);
        assert!(attempt.user_answer.is_none());
        assert!(!attempt.is_correct);
    }

    #[test]
    fn selection_can_change_until_finalized() {
        let mut s = session(3, TimeoutPolicy::Graded);
        s.select(AnswerChoice::Species(2)).unwrap();
        s.select(AnswerChoice::DontKnow).unwrap();
        s.select(AnswerChoice::Species(1)).unwrap();
        assert!(s.attempts().is_empty());
        let attempt = s.skip().unwrap();
        assert_eq!(attempt.points, 1);
    }

    #[test]
    fn selecting_a_non_option_is_rejected() {
        let mut s = session(3, TimeoutPolicy::Graded);
        assert_eq!(
            s.select(AnswerChoice::Species(99)),
            Err(QuizError::InvalidChoice(99))
        );
    }

    #[test]
    fn timeout_without_selection_scores_zero_with_null_answer() {
        let mut s = session(3, TimeoutPolicy::Graded);
        run_out_the_clock(&mut s);
        assert_eq!(s.phase(), Phase::Answered);
        let attempt = &s.attempts()[0];
        assert!(attempt.user_answer.is_none());
        assert_eq!(attempt.points, 0);
    }

    #[test]
    fn graded_timeout_scores_the_tentative_selection() {
        let mut s = session(3, TimeoutPolicy::Graded);
        let correct_id = s.current_question().correct.id;
        s.select(AnswerChoice::Species(correct_id)).unwrap();
        run_out_the_clock(&mut s);
        assert_eq!(s.attempts()[0].points, 1);
        assert!(s.attempts()[0].is_correct);
    }

    #[test]
    fn forfeit_timeout_awards_nothing_even_when_correct() {
        let mut s = session(3, TimeoutPolicy::Forfeit);
        let correct_id = s.current_question().correct.id;
        s.select(AnswerChoice::Species(correct_id)).unwrap();
        run_out_the_clock(&mut s);
        let attempt = &s.attempts()[0];
        assert!(attempt.is_correct);
        assert_eq!(attempt.points, 0);
        assert!(attempt.user_answer.is_none());
    }

    #[test]
    fn finalization_is_a_one_time_latch() {
        let mut s = session(3, TimeoutPolicy::Graded);
        s.skip().unwrap();
        // A racing skip or stale timer must not create a second attempt.
        assert_eq!(s.skip().unwrap_err(), QuizError::AlreadyFinalized);
        assert_eq!(
            s.select(AnswerChoice::DontKnow).unwrap_err(),
            QuizError::AlreadyFinalized
        );
        s.tick();
        assert_eq!(s.attempts().len(), 1);
    }

    #[test]
    fn advance_moves_through_questions_and_finishes_once() {
        let mut s = session(2, TimeoutPolicy::Graded);
        assert_eq!(s.advance().unwrap_err(), QuizError::NotAnswered);

        s.skip().unwrap();
        assert_eq!(
            s.advance().unwrap(),
            Phase::AwaitingAnswer {
                countdown: COUNTDOWN_SECONDS
            }
        );
        assert_eq!(s.index(), 1);

        s.skip().unwrap();
        assert_eq!(s.advance().unwrap(), Phase::Finished);
        assert_eq!(s.attempts().len(), 2);

        // Terminal: no further input of any kind.
        assert_eq!(s.skip().unwrap_err(), QuizError::Finished);
        assert_eq!(
            s.select(AnswerChoice::DontKnow).unwrap_err(),
            QuizError::Finished
        );
        assert_eq!(s.advance().unwrap_err(), QuizError::Finished);
        assert_eq!(s.tick(), Phase::Finished);
    }

    #[test]
    fn tentative_selection_resets_between_questions() {
        let mut s = session(2, TimeoutPolicy::Graded);
        s.select(AnswerChoice::Species(1)).unwrap();
        s.skip().unwrap();
        s.advance().unwrap();
        assert!(s.tentative().is_none());
    }

    #[test]
    fn completed_attempts_are_handed_out_exactly_once() {
        let mut s = session(2, TimeoutPolicy::Graded);
        assert!(s.take_completed().is_none());

        s.skip().unwrap();
        s.advance().unwrap();
        s.skip().unwrap();
        s.advance().unwrap();

        let attempts = s.take_completed().expect("first take yields attempts");
        assert_eq!(attempts.len(), 2);
        assert!(s.take_completed().is_none(), "second take must be empty");
    }

    #[test]
    fn aborted_sessions_never_persist() {
        let mut s = session(3, TimeoutPolicy::Graded);
        s.skip().unwrap();
        s.abort();
        assert!(s.is_finished());
        assert!(s.take_completed().is_none());
    }
}
