mod config;
mod policy;
mod rules;

pub use config::{
    LevelThresholds, PersonaBands, ScoringConfig, ScoringConfigError, ALL_ROUNDER_PERCENT,
    GREEN_PERCENT, POLISHED_PERCENT, REBUILD_PERCENT, YELLOW_PERCENT,
};

use super::bank::QuestionBank;
use super::domain::{Answers, Summary};
use super::persona::PersonaId;
use serde::{Deserialize, Serialize};

/// Stateless engine turning answers into category scores, levels and a fallback persona.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn canonical() -> Self {
        Self {
            config: ScoringConfig::canonical(),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores every category in display order. Missing and unsure answers contribute zero.
    pub fn compute_summary(&self, answers: &Answers, bank: &QuestionBank) -> Summary {
        rules::summarize(answers, bank, &self.config.levels)
    }

    pub fn compute_fallback_persona(&self, summary: &Summary) -> PersonaId {
        policy::fallback_persona(summary, &self.config.personas)
    }

    pub fn score(&self, answers: &Answers, bank: &QuestionBank) -> ScoreOutcome {
        let summary = self.compute_summary(answers, bank);
        let fallback_persona = self.compute_fallback_persona(&summary);

        ScoreOutcome {
            summary,
            fallback_persona,
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::canonical()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub summary: Summary,
    pub fallback_persona: PersonaId,
}
