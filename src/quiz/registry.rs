// src/quiz/registry.rs

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::quiz::session::QuizSession;

/// Shared handle to one live session. The inner mutex serializes every
/// transition, so a skip request and a timer tick arriving together cannot
/// both finalize the same question.
pub type SessionHandle = Arc<Mutex<QuizSession>>;

/// In-memory table of live quiz sessions, shared between request handlers
/// and the per-session driver tasks. Finished or abandoned sessions are
/// removed; results live in the database, not here.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<Mutex<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: QuizSession) -> SessionHandle {
        let id = session.id();
        let handle: SessionHandle = Arc::new(Mutex::new(session));
        self.inner.lock().await.insert(id, handle.clone());
        handle
    }

    pub async fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        self.inner.lock().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &Uuid) -> Option<SessionHandle> {
        self.inner.lock().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{
        AnswerOption, MediaRef, Question, QuizType,
        session::{SessionConfig, TimeoutPolicy},
    };

    fn sample_session() -> QuizSession {
        let option = AnswerOption {
            id: 1,
            name_local: "kos".to_string(),
            name_latin: "Turdus merula".to_string(),
        };
        QuizSession::new(
            vec![Question {
                correct: option.clone(),
                options: vec![option],
                media: MediaRef::default(),
            }],
            SessionConfig {
                user_email: "test@example.com".to_string(),
                quiz_type: QuizType::Audio,
                official: false,
                timeout_policy: TimeoutPolicy::Graded,
            },
        )
    }

    #[tokio::test]
    async fn insert_get_remove_roundtrip() {
        let registry = SessionRegistry::new();
        let id = {
            let handle = registry.insert(sample_session()).await;
            let guard = handle.lock().await;
            guard.id()
        };

        assert_eq!(registry.len().await, 1);
        assert!(registry.get(&id).await.is_some());

        registry.remove(&id).await;
        assert!(registry.get(&id).await.is_none());
        assert_eq!(registry.len().await, 0);
    }
}
