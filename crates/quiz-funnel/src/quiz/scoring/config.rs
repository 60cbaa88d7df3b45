use serde::{Deserialize, Serialize};

/// Thresholds classifying a category score, as percentages of the category maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelThresholds {
    pub green_percent: u32,
    pub yellow_percent: u32,
}

/// Bands of the total score driving the fallback persona, as percentages of the maximum total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaBands {
    /// At or above: all-rounder.
    pub all_rounder_percent: u32,
    /// At or above (and below the all-rounder band): polished but incomplete.
    pub polished_percent: u32,
    /// At or below: needs a rebuild.
    pub rebuild_percent: u32,
}

/// Tunable parameters of the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub levels: LevelThresholds,
    pub personas: PersonaBands,
}

pub const GREEN_PERCENT: u32 = 80;
pub const YELLOW_PERCENT: u32 = 47;
pub const ALL_ROUNDER_PERCENT: u32 = 80;
pub const POLISHED_PERCENT: u32 = 60;
pub const REBUILD_PERCENT: u32 = 30;

impl ScoringConfig {
    pub const fn canonical() -> Self {
        Self {
            levels: LevelThresholds {
                green_percent: GREEN_PERCENT,
                yellow_percent: YELLOW_PERCENT,
            },
            personas: PersonaBands {
                all_rounder_percent: ALL_ROUNDER_PERCENT,
                polished_percent: POLISHED_PERCENT,
                rebuild_percent: REBUILD_PERCENT,
            },
        }
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let LevelThresholds {
            green_percent,
            yellow_percent,
        } = self.levels;
        if green_percent > 100 || yellow_percent > green_percent {
            return Err(ScoringConfigError::LevelOrder {
                yellow: yellow_percent,
                green: green_percent,
            });
        }

        let PersonaBands {
            all_rounder_percent,
            polished_percent,
            rebuild_percent,
        } = self.personas;
        if all_rounder_percent > 100
            || polished_percent > all_rounder_percent
            || rebuild_percent >= polished_percent
        {
            return Err(ScoringConfigError::PersonaBandOrder {
                rebuild: rebuild_percent,
                polished: polished_percent,
                all_rounder: all_rounder_percent,
            });
        }

        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScoringConfigError {
    #[error("level thresholds must satisfy yellow ({yellow}%) <= green ({green}%) <= 100%")]
    LevelOrder { yellow: u32, green: u32 },
    #[error(
        "persona bands must satisfy rebuild ({rebuild}%) < polished ({polished}%) <= all-rounder ({all_rounder}%) <= 100%"
    )]
    PersonaBandOrder {
        rebuild: u32,
        polished: u32,
        all_rounder: u32,
    },
}
