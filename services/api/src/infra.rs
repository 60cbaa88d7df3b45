use metrics_exporter_prometheus::PrometheusHandle;
use quiz_funnel::quiz::{
    AnswerEntry, Category, FunnelSettings, LeadDeliveryError, LeadPublisher, LeadReport, Level,
    NarrativeSection, Narrator, NarratorError, NarratorRequest, NarratorResponse, PersonaId,
    QuestionBank, QuestionId, QuizFunnelService, ScoringEngine, SessionId, SessionRecord,
    SessionRepository, SessionRepositoryError, Summary,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ApiService =
    QuizFunnelService<InMemorySessionRepository, ProfileNarrator, InMemoryLeadOutbox>;

pub(crate) fn build_service(
    bank: QuestionBank,
    settings: FunnelSettings,
) -> (ApiService, Arc<InMemoryLeadOutbox>) {
    let outbox = Arc::new(InMemoryLeadOutbox::default());
    let service = QuizFunnelService::new(
        bank,
        ScoringEngine::canonical(),
        Arc::new(InMemorySessionRepository::default()),
        Arc::new(ProfileNarrator::default()),
        outbox.clone(),
        settings,
    );
    (service, outbox)
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for InMemorySessionRepository {
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
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(SessionRepositoryError::NotFound)
        }
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

/// Holds captured leads until a delivery integration drains them.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadOutbox {
    events: Arc<Mutex<Vec<LeadReport>>>,
}

impl LeadPublisher for InMemoryLeadOutbox {
    fn publish(&self, lead: LeadReport) -> Result<(), LeadDeliveryError> {
        info!(
            session_id = %lead.session_id.0,
            persona = lead.persona.as_str(),
            total = lead.total_score,
            "lead queued for delivery"
        );
        let mut guard = self.events.lock().expect("lead mutex poisoned");
        guard.push(lead);
        Ok(())
    }
}

impl InMemoryLeadOutbox {
    pub(crate) fn events(&self) -> Vec<LeadReport> {
        self.events.lock().expect("lead mutex poisoned").clone()
    }
}

/// In-process narrator writing the report from the persona catalog.
///
/// Unlike the score bands it can pick the pattern-based personas: a strong
/// conversationalist whose appearance lags reads as a charmer, and a strong
/// mindset held back by a weak social presence reads as a hidden gem.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProfileNarrator {
    engine: ScoringEngine,
}

impl ProfileNarrator {
    fn choose(&self, request: &NarratorRequest) -> PersonaId {
        let level = |category: Category| {
            request
                .categories
                .iter()
                .find(|entry| entry.category == category)
                .map(|entry| entry.level)
        };

        let conversation = level(Category::Conversation);
        let appearance = level(Category::Appearance);
        if conversation == Some(Level::Green) && appearance != Some(Level::Green) {
            return PersonaId::Charmer;
        }

        if level(Category::Mindset) == Some(Level::Green)
            && level(Category::SocialPresence) == Some(Level::Red)
        {
            return PersonaId::HiddenGem;
        }

        self.engine.compute_fallback_persona(&Summary {
            categories: Vec::new(),
            total_score: request.total_score,
            max_total: request.max_total,
        })
    }
}

impl Narrator for ProfileNarrator {
    fn narrate(&self, request: &NarratorRequest) -> Result<NarratorResponse, NarratorError> {
        let strongest = request
            .categories
            .iter()
            .max_by_key(|entry| entry.score)
            .ok_or_else(|| NarratorError::Malformed("request carries no categories".to_string()))?;
        let weakest = request
            .categories
            .iter()
            .min_by_key(|entry| entry.score)
            .unwrap_or(strongest);

        let persona = self.choose(request);
        let profile = persona.profile();

        Ok(NarratorResponse {
            selected_persona_id: persona.as_str().to_string(),
            headline: format!(
                "{}: {} of {} points",
                profile.title, request.total_score, request.max_total
            ),
            sections: vec![
                NarrativeSection {
                    title: "Where you shine".to_string(),
                    body: format!(
                        "{} is your strongest area at {} of {}.",
                        strongest.category.display_name(),
                        strongest.score,
                        strongest.max_score
                    ),
                },
                NarrativeSection {
                    title: "What to work on".to_string(),
                    body: format!(
                        "{} has the most room to grow ({} of {}). {}",
                        weakest.category.display_name(),
                        weakest.score,
                        weakest.max_score,
                        profile.advice
                    ),
                },
            ],
        })
    }
}

/// Parses `ID=VALUE` answer arguments.
pub(crate) fn parse_answer(raw: &str) -> Result<AnswerEntry, String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{raw}'"))?;
    let question_id = id
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("invalid question id '{id}' ({err})"))?;
    let value = value
        .trim()
        .parse::<i32>()
        .map_err(|err| format!("invalid answer value '{value}' ({err})"))?;

    Ok(AnswerEntry {
        question_id: QuestionId(question_id),
        value,
    })
}
