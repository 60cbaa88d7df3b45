use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bank::QuestionBank;
use super::domain::Question;
use super::persona::PersonaId;
use super::report::QuizReport;
use super::session::{FunnelStage, FunnelState};

/// Identifier wrapper for quiz sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Repository record holding the funnel state and the latest report.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub state: FunnelState,
    pub report: Option<QuizReport>,
    pub started_at: DateTime<Utc>,
    pub last_narrated_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    pub fn new(id: SessionId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            state: FunnelState::new(),
            report: None,
            started_at,
            last_narrated_at: None,
        }
    }

    pub fn view(&self, bank: &QuestionBank) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            stage: self.state.stage,
            answered: self.state.answers.len(),
            total_questions: bank.len(),
            current_question: self.state.current_question(bank).cloned(),
            persona: self.report.as_ref().map(|report| report.persona),
        }
    }
}

/// Public projection of a session used by API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub stage: FunnelStage,
    pub answered: usize,
    pub total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<PersonaId>,
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, SessionRepositoryError>;
    fn update(&self, record: SessionRecord) -> Result<(), SessionRepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionRepositoryError>;
    fn remove(&self, id: &SessionId) -> Result<(), SessionRepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionRepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
