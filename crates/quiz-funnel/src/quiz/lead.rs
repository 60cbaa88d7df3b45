use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Category, Level};
use super::persona::PersonaId;
use super::report::{NarrativeSource, QuizReport};
use super::repository::SessionId;

/// Email-capture form contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl LeadSubmission {
    pub fn validate(&self) -> Result<(), LeadError> {
        let email = self.email.trim();
        let invalid = || LeadError::InvalidEmail(email.to_string());

        if email.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
        if local.is_empty() || domain.contains('@') {
            return Err(invalid());
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(invalid());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadCategoryScore {
    pub category: Category,
    pub score: u32,
    pub max_score: u32,
    pub level: Level,
}

/// Outbound payload handed to the marketing integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadReport {
    pub session_id: SessionId,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub persona: PersonaId,
    pub persona_title: String,
    pub narrative_source: NarrativeSource,
    pub total_score: u32,
    pub max_total: u32,
    pub categories: Vec<LeadCategoryScore>,
    pub sales_page_url: String,
    pub captured_at: DateTime<Utc>,
}

impl LeadReport {
    pub fn new(
        session_id: SessionId,
        submission: LeadSubmission,
        report: &QuizReport,
        captured_at: DateTime<Utc>,
    ) -> Self {
        let name = submission
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Self {
            session_id,
            email: submission.email.trim().to_string(),
            name,
            persona: report.persona,
            persona_title: report.profile.title.to_string(),
            narrative_source: report.narrative.source,
            total_score: report.summary.total_score,
            max_total: report.summary.max_total,
            categories: report
                .summary
                .categories
                .iter()
                .map(|result| LeadCategoryScore {
                    category: result.category,
                    score: result.score,
                    max_score: result.max_score,
                    level: result.level,
                })
                .collect(),
            sales_page_url: report.sales_page_url.clone(),
            captured_at,
        }
    }
}

/// Outbound hook for captured leads (e-mail, webhook or CRM adapters).
pub trait LeadPublisher: Send + Sync {
    fn publish(&self, lead: LeadReport) -> Result<(), LeadDeliveryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadError {
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LeadDeliveryError {
    #[error("lead transport unavailable: {0}")]
    Transport(String),
}
