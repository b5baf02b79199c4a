//! In-memory interview sessions: the latest uploaded documents, the questions
//! generated from them, and the answers graded so far.
//!
//! Sessions are keyed by the `x-session-id` header. Requests without it all
//! share the `default` session, which behaves like a single process-wide
//! record. Writes to one session are last-writer-wins; sessions never see
//! each other's data. Nothing survives a restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::interview::feedback::AnswerFeedback;
use crate::interview::sampling::remove_duplicates;

pub const SESSION_HEADER: &str = "x-session-id";
pub const DEFAULT_SESSION: &str = "default";
const MAX_SESSION_ID_LEN: usize = 128;

/// Identifies a session. Extracted from request headers by handlers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Accepts 1..=128 chars of `[A-Za-z0-9_-]` after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw.len() <= MAX_SESSION_ID_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| SessionId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        SessionId(DEFAULT_SESSION.to_string())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get(SESSION_HEADER) {
            None => Ok(SessionId::default()),
            Some(value) => value
                .to_str()
                .ok()
                .and_then(SessionId::parse)
                .ok_or_else(|| AppError::validation("Invalid x-session-id header.")),
        }
    }
}

/// Everything remembered about one session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub job_description_text: String,
    pub resume_text: String,
    /// Never contains duplicates.
    pub generated_questions: Vec<String>,
    /// Graded answers, oldest first. Survives a new upload.
    pub feedback_history: Vec<AnswerFeedback>,
    pub updated_at: DateTime<Utc>,
    /// Changes whenever the documents change. Unique across the store.
    #[serde(skip)]
    pub revision: u64,
}

impl SessionState {
    fn new(
        job_description_text: String,
        resume_text: String,
        feedback_history: Vec<AnswerFeedback>,
        revision: u64,
    ) -> Self {
        Self {
            job_description_text,
            resume_text,
            generated_questions: Vec::new(),
            feedback_history,
            updated_at: Utc::now(),
            revision,
        }
    }
}

/// Shared in-memory store. Cloning is cheap; all clones see the same data.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<SessionId, SessionState>>>,
    next_revision: Arc<AtomicU64>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            next_revision: Arc::new(AtomicU64::new(1)),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Snapshot of a session, or `None` if nothing was ever uploaded to it.
    pub async fn get(&self, id: &SessionId) -> Option<SessionState> {
        self.inner.read().await.get(id).cloned()
    }

    /// Replaces the documents. Questions generated from the previous
    /// documents are discarded.
    // Uploads store documents and questions together through `commit`.
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn set_documents(&self, id: &SessionId, job_description: String, resume: String) {
        let mut sessions = self.inner.write().await;
        self.make_room(&mut sessions, id);
        let history = Self::take_history(&mut sessions, id);
        let state = SessionState::new(job_description, resume, history, self.bump_revision());
        sessions.insert(id.clone(), state);
    }

    /// Replaces the question list, deduplicating it first, and returns the
    /// stored list.
    ///
    /// `revision` is the revision of the documents the questions were generated
    /// from. When the session has since been re-uploaded or evicted the write
    /// is dropped and `None` is returned.
    pub async fn set_questions(
        &self,
        id: &SessionId,
        revision: u64,
        questions: Vec<String>,
    ) -> Option<Vec<String>> {
        let questions = remove_duplicates(questions);
        let mut sessions = self.inner.write().await;
        let Some(state) = sessions.get_mut(id) else {
            debug!("Session {} is gone; dropping questions", id.as_str());
            return None;
        };
        if state.revision != revision {
            debug!(
                "Session {} documents changed (revision {} -> {}); dropping questions",
                id.as_str(),
                revision,
                state.revision
            );
            return None;
        }
        state.generated_questions = questions.clone();
        state.updated_at = Utc::now();
        Some(questions)
    }

    /// Appends a graded answer. Returns `false` when the session does not exist.
    pub async fn record_feedback(&self, id: &SessionId, entry: AnswerFeedback) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(id) {
            Some(state) => {
                state.feedback_history.push(entry);
                state.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Stores documents and their questions under one write lock, so readers
    /// never observe new documents paired with old questions.
    pub async fn commit(
        &self,
        id: &SessionId,
        job_description: String,
        resume: String,
        questions: Vec<String>,
    ) -> SessionState {
        let questions = remove_duplicates(questions);

        let mut sessions = self.inner.write().await;
        self.make_room(&mut sessions, id);
        let history = Self::take_history(&mut sessions, id);
        let mut state = SessionState::new(job_description, resume, history, self.bump_revision());
        state.generated_questions = questions;
        sessions.insert(id.clone(), state.clone());
        debug!(
            "Session {} committed with {} questions",
            id.as_str(),
            state.generated_questions.len()
        );
        state
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    fn bump_revision(&self) -> u64 {
        self.next_revision.fetch_add(1, Ordering::Relaxed)
    }

    fn take_history(
        sessions: &mut HashMap<SessionId, SessionState>,
        id: &SessionId,
    ) -> Vec<AnswerFeedback> {
        sessions
            .get_mut(id)
            .map(|state| std::mem::take(&mut state.feedback_history))
            .unwrap_or_default()
    }

    /// Evicts the least recently updated session when inserting `incoming`
    /// would exceed the cap.
    fn make_room(&self, sessions: &mut HashMap<SessionId, SessionState>, incoming: &SessionId) {
        if sessions.contains_key(incoming) || sessions.len() < self.max_sessions {
            return;
        }
        let oldest = sessions
            .iter()
            .min_by_key(|(_, state)| state.updated_at)
            .map(|(id, _)| id.clone());
        if let Some(oldest) = oldest {
            info!("Session cap reached; evicting session {}", oldest.as_str());
            sessions.remove(&oldest);
        }
    }
}
