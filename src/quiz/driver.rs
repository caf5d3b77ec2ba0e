// src/quiz/driver.rs

use std::time::Duration;

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    config::SETTLE_DELAY_MS,
    quiz::{
        registry::SessionRegistry,
        score::{self, QuizOutcome},
        session::Phase,
    },
};

/// Spawns the timing task for one session: ticks the countdown once per
/// second, advances after the settle delay and performs the single
/// persistence call when the session finishes.
///
/// All timing for a session is owned by this one task; it exits as soon as
/// the session reaches Finished or disappears from the registry, so no
/// stale timer can fire against a later question's state.
pub fn spawn(pool: PgPool, registry: SessionRegistry, id: Uuid) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run(pool, registry, id))
}

async fn run(pool: PgPool, registry: SessionRegistry, id: Uuid) {
    loop {
        // Abandoned sessions are dropped from the registry; stop timing.
        let Some(handle) = registry.get(&id).await else {
            return;
        };

        let (observed, wait) = {
            let session = handle.lock().await;
            match session.phase() {
                phase @ Phase::AwaitingAnswer { .. } => (phase, Duration::from_secs(1)),
                Phase::Answered => (Phase::Answered, Duration::from_millis(SETTLE_DELAY_MS)),
                Phase::Finished => break,
            }
        };

        tokio::time::sleep(wait).await;

        // Act only if the session is still in the phase we slept for; a skip
        // arriving mid-sleep moves it to Answered, and that question then
        // gets its full settle delay on the next loop.
        let mut session = handle.lock().await;
        match (observed, session.phase()) {
            (Phase::AwaitingAnswer { .. }, Phase::AwaitingAnswer { .. }) => {
                session.tick();
            }
            (Phase::Answered, Phase::Answered) => {
                if let Err(e) = session.advance() {
                    tracing::warn!("session {}: advance failed: {}", id, e);
                }
            }
            _ => {}
        }
    }

    finish(&pool, &registry, id).await;
}

/// Persists the completed session exactly once. The write is
/// fire-and-forget: a failure is logged, the user still sees their results.
/// The finished session stays in the registry so its outcome remains
/// retrievable; the client's delete call retires it.
async fn finish(pool: &PgPool, registry: &SessionRegistry, id: Uuid) {
    let outcome = {
        let Some(handle) = registry.get(&id).await else {
            return;
        };
        let mut session = handle.lock().await;
        session
            .take_completed()
            .map(|attempts| score::aggregate(session.config(), &attempts))
    };

    if let Some(outcome) = outcome {
        if let Err(e) = insert_result(pool, &outcome).await {
            tracing::error!("Failed to store quiz result for {}: {:?}", outcome.user_email, e);
        } else {
            tracing::info!(
                "Stored quiz result: {} scored {} over {} questions",
                outcome.user_email,
                outcome.total_points,
                outcome.question_count
            );
        }
    }
}

async fn insert_result(pool: &PgPool, outcome: &QuizOutcome) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO quiz_results
        (user_email, question_count, total_points, is_official, quiz_type, breakdown)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&outcome.user_email)
    .bind(outcome.question_count)
    .bind(outcome.total_points)
    .bind(outcome.is_official)
    .bind(outcome.quiz_type.as_str())
    .bind(Json(&outcome.breakdown))
    .execute(pool)
    .await?;

    Ok(())
}
