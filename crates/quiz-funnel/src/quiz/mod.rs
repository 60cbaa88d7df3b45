//! Quiz funnel: question bank, scoring engine, persona classification and the session service
//! that walks a visitor from the landing page to the result and email capture.

pub mod bank;
pub mod domain;
pub mod lead;
pub mod narrator;
pub mod persona;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use bank::{QuestionBank, QuestionBankError};
pub use domain::{
    AnswerEntry, AnswerOption, Answers, Category, CategoryResult, Level, OptionScale, Question,
    QuestionId, Summary,
};
pub use lead::{LeadDeliveryError, LeadError, LeadPublisher, LeadReport, LeadSubmission};
pub use narrator::{
    NarrativeSection, Narrator, NarratorCooldown, NarratorError, NarratorRequest,
    NarratorResponse,
};
pub use persona::{normalize_persona_id, PersonaId, PersonaProfile};
pub use report::{Narrative, NarrativeSource, QuizReport};
pub use repository::{
    SessionId, SessionRecord, SessionRepository, SessionRepositoryError, SessionView,
};
pub use router::quiz_router;
pub use scoring::{ScoreOutcome, ScoringConfig, ScoringConfigError, ScoringEngine};
pub use service::{FunnelServiceError, FunnelSettings, QuizFunnelService};
pub use session::{FunnelEvent, FunnelStage, FunnelState, TransitionError};
