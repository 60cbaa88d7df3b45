use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::quiz::bank::QuestionBank;
use crate::quiz::domain::{Answers, Category};
use crate::quiz::lead::{LeadDeliveryError, LeadPublisher, LeadReport};
use crate::quiz::narrator::{
    NarrativeSection, Narrator, NarratorCooldown, NarratorError, NarratorRequest,
    NarratorResponse,
};
use crate::quiz::repository::{
    SessionId, SessionRecord, SessionRepository, SessionRepositoryError,
};
use crate::quiz::scoring::ScoringEngine;
use crate::quiz::service::{FunnelSettings, QuizFunnelService};

pub(super) fn bank() -> QuestionBank {
    QuestionBank::standard()
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::canonical()
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap()
}

/// Every question answered with the same value.
pub(super) fn uniform_answers(bank: &QuestionBank, value: i32) -> Answers {
    let mut answers = Answers::new();
    for question in bank.questions() {
        answers.record(question.id, value);
    }
    answers
}

/// Answers each category with the given per-question values, in question order.
pub(super) fn answers_by_category(
    bank: &QuestionBank,
    values: &[(Category, [i32; 5])],
) -> Answers {
    let mut answers = Answers::new();
    for (category, category_values) in values {
        for (question, value) in bank.questions_in(*category).zip(category_values.iter()) {
            answers.record(question.id, *value);
        }
    }
    answers
}

pub(super) fn settings() -> FunnelSettings {
    FunnelSettings {
        sales_page_url: "https://shop.example.com/course".to_string(),
        narrator_enabled: true,
        narrator_cooldown: NarratorCooldown::from_secs(60),
    }
}

pub(super) type TestService = QuizFunnelService<MemorySessions, ScriptedNarrator, MemoryLeads>;

pub(super) fn build_service(
    narrator: ScriptedNarrator,
) -> (TestService, Arc<MemorySessions>, Arc<ScriptedNarrator>, Arc<MemoryLeads>) {
    build_service_with(narrator, settings())
}

pub(super) fn build_service_with(
    narrator: ScriptedNarrator,
    settings: FunnelSettings,
) -> (TestService, Arc<MemorySessions>, Arc<ScriptedNarrator>, Arc<MemoryLeads>) {
    let repository = Arc::new(MemorySessions::default());
    let narrator = Arc::new(narrator);
    let leads = Arc::new(MemoryLeads::default());
    let service = QuizFunnelService::new(
        bank(),
        engine(),
        repository.clone(),
        narrator.clone(),
        leads.clone(),
        settings,
    );
    (service, repository, narrator, leads)
}

/// Create a session and answer every question with `value`, leaving it in the diagnosing stage.
pub(super) fn completed_session<R, N, L>(
    service: &QuizFunnelService<R, N, L>,
    value: i32,
) -> SessionId
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    let record = service.create_session(now()).expect("session created");
    service.start(&record.id).expect("quiz starts");
    answer_all(service, &record.id, value);
    record.id
}

pub(super) fn answer_all<R, N, L>(service: &QuizFunnelService<R, N, L>, id: &SessionId, value: i32)
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    let question_ids: Vec<_> = service
        .bank()
        .questions()
        .iter()
        .map(|question| question.id)
        .collect();
    for question_id in question_ids {
        service
            .answer(id, question_id, value)
            .expect("answer accepted");
    }
}

#[derive(Default)]
pub(super) struct MemorySessions {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl SessionRepository for MemorySessions {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, SessionRepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(SessionRepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), SessionRepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), SessionRepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(SessionRepositoryError::NotFound)
    }
}

pub(super) struct UnavailableSessions;

impl SessionRepository for UnavailableSessions {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, SessionRepositoryError> {
        Err(SessionRepositoryError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<(), SessionRepositoryError> {
        Err(SessionRepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        Err(SessionRepositoryError::Unavailable("store offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), SessionRepositoryError> {
        Err(SessionRepositoryError::Unavailable("store offline".to_string()))
    }
}

/// Narrator double returning a canned persona id, or failing when none is configured.
pub(super) struct ScriptedNarrator {
    persona_id: Option<String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<NarratorRequest>>,
}

impl ScriptedNarrator {
    pub(super) fn replying(persona_id: &str) -> Self {
        Self {
            persona_id: Some(persona_id.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub(super) fn offline() -> Self {
        Self {
            persona_id: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn last_request(&self) -> Option<NarratorRequest> {
        self.last_request
            .lock()
            .expect("narrator mutex poisoned")
            .clone()
    }
}

impl Narrator for ScriptedNarrator {
    fn narrate(&self, request: &NarratorRequest) -> Result<NarratorResponse, NarratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().expect("narrator mutex poisoned") = Some(request.clone());

        match &self.persona_id {
            Some(persona_id) => Ok(NarratorResponse {
                selected_persona_id: persona_id.clone(),
                headline: "A personal read on your results".to_string(),
                sections: vec![NarrativeSection {
                    title: "Strengths".to_string(),
                    body: format!("You scored {} of {}.", request.total_score, request.max_total),
                }],
            }),
            None => Err(NarratorError::Unavailable("connection refused".to_string())),
        }
    }
}

#[derive(Default)]
pub(super) struct MemoryLeads {
    events: Mutex<Vec<LeadReport>>,
}

impl MemoryLeads {
    pub(super) fn events(&self) -> Vec<LeadReport> {
        self.events.lock().expect("lead mutex poisoned").clone()
    }
}

impl LeadPublisher for MemoryLeads {
    fn publish(&self, lead: LeadReport) -> Result<(), LeadDeliveryError> {
        self.events.lock().expect("lead mutex poisoned").push(lead);
        Ok(())
    }
}

pub(super) struct FailingLeads;

impl LeadPublisher for FailingLeads {
    fn publish(&self, _lead: LeadReport) -> Result<(), LeadDeliveryError> {
        Err(LeadDeliveryError::Transport("webhook timed out".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
