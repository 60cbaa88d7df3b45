//! Boundary to the external text-generation service that writes the personalized report.
//!
//! Everything the service returns is untrusted: the persona id is free text and is mapped onto
//! the closed persona set by [`PersonaId::from_untrusted`] before anything else sees it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::bank::QuestionBank;
use super::domain::{Answers, Category, Level, QuestionId, Summary};
use super::persona::PersonaId;

/// Structured payload handed to the narrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarratorRequest {
    pub total_score: u32,
    pub max_total: u32,
    pub categories: Vec<NarratorCategory>,
    pub answers: Vec<NarratorAnswer>,
    pub persona_ids: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarratorCategory {
    pub category: Category,
    pub score: u32,
    pub max_score: u32,
    pub level: Level,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarratorAnswer {
    pub question_id: QuestionId,
    pub question: String,
    pub value: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl NarratorRequest {
    pub fn new(summary: &Summary, answers: &Answers, bank: &QuestionBank) -> Self {
        let categories = summary
            .categories
            .iter()
            .map(|result| NarratorCategory {
                category: result.category,
                score: result.score,
                max_score: result.max_score,
                level: result.level,
            })
            .collect();

        let answers = bank
            .questions()
            .iter()
            .filter_map(|question| {
                answers.get(question.id).map(|value| NarratorAnswer {
                    question_id: question.id,
                    question: question.text.clone(),
                    value,
                    label: bank.scale().label_for(value).map(str::to_string),
                })
            })
            .collect();

        Self {
            total_score: summary.total_score,
            max_total: summary.max_total,
            categories,
            answers,
            persona_ids: PersonaId::KNOWN_IDS.to_vec(),
        }
    }
}

/// Raw narrator output; `selected_persona_id` has not been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarratorResponse {
    pub selected_persona_id: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub sections: Vec<NarrativeSection>,
}

impl NarratorResponse {
    /// Parses the JSON object the narrator is asked to produce.
    pub fn from_json(raw: &str) -> Result<Self, NarratorError> {
        serde_json::from_str(raw.trim()).map_err(|err| NarratorError::Malformed(err.to_string()))
    }

    pub fn persona(&self) -> PersonaId {
        PersonaId::from_untrusted(&self.selected_persona_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeSection {
    pub title: String,
    pub body: String,
}

/// Text-generation collaborator. Implementations own transport and prompt details.
pub trait Narrator: Send + Sync {
    fn narrate(&self, request: &NarratorRequest) -> Result<NarratorResponse, NarratorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NarratorError {
    #[error("narrator unavailable: {0}")]
    Unavailable(String),
    #[error("narrator returned malformed output: {0}")]
    Malformed(String),
}

/// Minimum spacing between narrator calls for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarratorCooldown {
    min_interval: Duration,
}

impl NarratorCooldown {
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    /// Saturates at the largest representable interval.
    pub fn from_secs(secs: u64) -> Self {
        Self::try_from_secs(secs).unwrap_or(Self::new(Duration::MAX))
    }

    /// `None` when `secs` does not fit in a `chrono::Duration`.
    pub fn try_from_secs(secs: u64) -> Option<Self> {
        i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .map(Self::new)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn ready(&self, last_call: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_call {
            Some(last) => now - last >= self.min_interval,
            None => true,
        }
    }
}
