use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::Summary;
use super::narrator::{NarrativeSection, NarratorResponse};
use super::persona::{PersonaId, PersonaProfile};

/// Which path produced the persona and prose of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    Narrator,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narrative {
    pub source: NarrativeSource,
    pub headline: String,
    pub sections: Vec<NarrativeSection>,
}

impl Narrative {
    /// Narrator prose, with blanks filled from the persona profile.
    pub fn from_response(response: NarratorResponse, persona: PersonaId) -> Self {
        let fallback = Self::fallback(persona);
        let headline = if response.headline.trim().is_empty() {
            fallback.headline
        } else {
            response.headline
        };
        let sections = if response.sections.is_empty() {
            fallback.sections
        } else {
            response.sections
        };

        Self {
            source: NarrativeSource::Narrator,
            headline,
            sections,
        }
    }

    pub fn fallback(persona: PersonaId) -> Self {
        let profile = persona.profile();
        Self {
            source: NarrativeSource::Fallback,
            headline: profile.title.to_string(),
            sections: vec![
                NarrativeSection {
                    title: "Your type".to_string(),
                    body: profile.tagline.to_string(),
                },
                NarrativeSection {
                    title: "Next step".to_string(),
                    body: profile.advice.to_string(),
                },
            ],
        }
    }
}

/// Everything the result page, chart and outbound payloads are rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizReport {
    pub summary: Summary,
    pub persona: PersonaId,
    pub profile: PersonaProfile,
    pub narrative: Narrative,
    pub sales_page_url: String,
    pub generated_at: DateTime<Utc>,
}

impl QuizReport {
    pub fn new(
        summary: Summary,
        persona: PersonaId,
        narrative: Narrative,
        sales_page_url: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            summary,
            persona,
            profile: persona.profile().clone(),
            narrative,
            sales_page_url: sales_page_url.into(),
            generated_at,
        }
    }

    pub fn from_narrator(
        summary: Summary,
        response: NarratorResponse,
        sales_page_url: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let persona = response.persona();
        let narrative = Narrative::from_response(response, persona);
        Self::new(summary, persona, narrative, sales_page_url, generated_at)
    }

    pub fn from_fallback(
        summary: Summary,
        persona: PersonaId,
        sales_page_url: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            summary,
            persona,
            Narrative::fallback(persona),
            sales_page_url,
            generated_at,
        )
    }
}
