use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::bank::QuestionBank;
use super::domain::{Answers, QuestionId};
use super::lead::{LeadDeliveryError, LeadError, LeadPublisher, LeadReport, LeadSubmission};
use super::narrator::{Narrator, NarratorCooldown, NarratorRequest};
use super::report::QuizReport;
use super::repository::{SessionId, SessionRecord, SessionRepository, SessionRepositoryError};
use super::scoring::{ScoreOutcome, ScoringEngine};
use super::session::{FunnelEvent, FunnelStage, TransitionError};

/// Funnel behavior that is configuration rather than logic.
#[derive(Debug, Clone)]
pub struct FunnelSettings {
    pub sales_page_url: String,
    pub narrator_enabled: bool,
    pub narrator_cooldown: NarratorCooldown,
}

impl Default for FunnelSettings {
    fn default() -> Self {
        Self {
            sales_page_url: "https://example.com/offer".to_string(),
            narrator_enabled: true,
            narrator_cooldown: NarratorCooldown::from_secs(30),
        }
    }
}

/// Service composing the question bank, scoring engine, narrator and lead hooks.
pub struct QuizFunnelService<R, N, L> {
    bank: Arc<QuestionBank>,
    engine: Arc<ScoringEngine>,
    repository: Arc<R>,
    narrator: Arc<N>,
    leads: Arc<L>,
    settings: FunnelSettings,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("quiz-{id:06}"))
}

impl<R, N, L> QuizFunnelService<R, N, L>
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    pub fn new(
        bank: QuestionBank,
        engine: ScoringEngine,
        repository: Arc<R>,
        narrator: Arc<N>,
        leads: Arc<L>,
        settings: FunnelSettings,
    ) -> Self {
        Self {
            bank: Arc::new(bank),
            engine: Arc::new(engine),
            repository,
            narrator,
            leads,
            settings,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn settings(&self) -> &FunnelSettings {
        &self.settings
    }

    /// Stateless scoring of an arbitrary answer set.
    pub fn score(&self, answers: &Answers) -> ScoreOutcome {
        let outcome = self.engine.score(answers, &self.bank);
        debug!(
            answered = answers.len(),
            total = outcome.summary.total_score,
            persona = outcome.fallback_persona.as_str(),
            "scored answers"
        );
        outcome
    }

    /// Open a new session on the landing stage.
    pub fn create_session(
        &self,
        now: DateTime<Utc>,
    ) -> Result<SessionRecord, FunnelServiceError> {
        let record = SessionRecord::new(next_session_id(), now);
        let stored = self.repository.insert(record)?;
        info!(session_id = %stored.id.0, "quiz session created");
        Ok(stored)
    }

    pub fn session(&self, id: &SessionId) -> Result<SessionRecord, FunnelServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(SessionRepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn start(&self, id: &SessionId) -> Result<SessionRecord, FunnelServiceError> {
        self.apply(id, FunnelEvent::Start)
    }

    pub fn answer(
        &self,
        id: &SessionId,
        question_id: QuestionId,
        value: i32,
    ) -> Result<SessionRecord, FunnelServiceError> {
        self.apply(id, FunnelEvent::Answer { question_id, value })
    }

    pub fn back(&self, id: &SessionId) -> Result<SessionRecord, FunnelServiceError> {
        self.apply(id, FunnelEvent::Back)
    }

    /// Discard all answers and the report, returning to the landing stage.
    pub fn restart(&self, id: &SessionId) -> Result<SessionRecord, FunnelServiceError> {
        let mut record = self.session(id)?;
        record.state = record.state.transition(FunnelEvent::Restart, &self.bank)?;
        record.report = None;
        self.repository.update(record.clone())?;
        info!(session_id = %id.0, "quiz session restarted");
        Ok(record)
    }

    /// Score a completed quiz and produce the report, preferring the narrator.
    ///
    /// A session already on the result stage returns its stored report.
    pub fn diagnose(
        &self,
        id: &SessionId,
        now: DateTime<Utc>,
    ) -> Result<QuizReport, FunnelServiceError> {
        let mut record = self.session(id)?;

        if record.state.stage == FunnelStage::Result {
            if let Some(report) = &record.report {
                return Ok(report.clone());
            }
        }

        let state = record.state.clone().transition(FunnelEvent::Diagnosed, &self.bank)?;
        let outcome = self.engine.score(&record.state.answers, &self.bank);

        let narrator_ready = self.settings.narrator_enabled
            && self
                .settings
                .narrator_cooldown
                .ready(record.last_narrated_at, now);

        let report = if narrator_ready {
            record.last_narrated_at = Some(now);
            let request = NarratorRequest::new(&outcome.summary, &record.state.answers, &self.bank);
            match self.narrator.narrate(&request) {
                Ok(response) => QuizReport::from_narrator(
                    outcome.summary,
                    response,
                    self.settings.sales_page_url.clone(),
                    now,
                ),
                Err(err) => {
                    warn!(session_id = %id.0, error = %err, "narrator failed, using fallback persona");
                    QuizReport::from_fallback(
                        outcome.summary,
                        outcome.fallback_persona,
                        self.settings.sales_page_url.clone(),
                        now,
                    )
                }
            }
        } else {
            debug!(session_id = %id.0, "narrator skipped, using fallback persona");
            QuizReport::from_fallback(
                outcome.summary,
                outcome.fallback_persona,
                self.settings.sales_page_url.clone(),
                now,
            )
        };

        record.state = state;
        record.report = Some(report.clone());
        self.repository.update(record)?;

        info!(
            session_id = %id.0,
            persona = report.persona.as_str(),
            source = ?report.narrative.source,
            total = report.summary.total_score,
            "quiz diagnosed"
        );

        Ok(report)
    }

    pub fn result(&self, id: &SessionId) -> Result<QuizReport, FunnelServiceError> {
        let record = self.session(id)?;
        record
            .report
            .ok_or(FunnelServiceError::ResultNotReady {
                stage: record.state.stage.label(),
            })
    }

    /// Validate the email form and hand the lead to the outbound publisher.
    pub fn capture_lead(
        &self,
        id: &SessionId,
        submission: LeadSubmission,
        now: DateTime<Utc>,
    ) -> Result<LeadReport, FunnelServiceError> {
        submission.validate()?;
        let report = self.result(id)?;

        let lead = LeadReport::new(id.clone(), submission, &report, now);
        self.leads.publish(lead.clone())?;
        info!(session_id = %id.0, persona = lead.persona.as_str(), "lead captured");

        Ok(lead)
    }

    fn apply(
        &self,
        id: &SessionId,
        event: FunnelEvent,
    ) -> Result<SessionRecord, FunnelServiceError> {
        let mut record = self.session(id)?;
        record.state = record.state.transition(event, &self.bank)?;
        self.repository.update(record.clone())?;
        Ok(record)
    }
}

/// Error raised by the funnel service.
#[derive(Debug, thiserror::Error)]
pub enum FunnelServiceError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] SessionRepositoryError),
    #[error(transparent)]
    Lead(#[from] LeadError),
    #[error(transparent)]
    LeadDelivery(#[from] LeadDeliveryError),
    #[error("no result yet: session is in the {stage} stage")]
    ResultNotReady { stage: &'static str },
}
