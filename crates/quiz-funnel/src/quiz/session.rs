use serde::{Deserialize, Serialize};

use super::bank::QuestionBank;
use super::domain::{Answers, Question, QuestionId};

/// Where a visitor currently is in the funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum FunnelStage {
    Hero,
    Quiz { index: usize },
    Diagnosing,
    Result,
}

impl FunnelStage {
    pub const fn label(self) -> &'static str {
        match self {
            FunnelStage::Hero => "hero",
            FunnelStage::Quiz { .. } => "quiz",
            FunnelStage::Diagnosing => "diagnosing",
            FunnelStage::Result => "result",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FunnelEvent {
    Start,
    Answer { question_id: QuestionId, value: i32 },
    Back,
    Diagnosed,
    Restart,
}

impl FunnelEvent {
    pub const fn label(self) -> &'static str {
        match self {
            FunnelEvent::Start => "start",
            FunnelEvent::Answer { .. } => "answer",
            FunnelEvent::Back => "back",
            FunnelEvent::Diagnosed => "diagnosed",
            FunnelEvent::Restart => "restart",
        }
    }
}

/// Stage plus the answers collected so far. Transitions consume the state and return the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelState {
    pub stage: FunnelStage,
    pub answers: Answers,
}

impl Default for FunnelState {
    fn default() -> Self {
        Self::new()
    }
}

impl FunnelState {
    pub fn new() -> Self {
        Self {
            stage: FunnelStage::Hero,
            answers: Answers::new(),
        }
    }

    pub fn transition(
        self,
        event: FunnelEvent,
        bank: &QuestionBank,
    ) -> Result<Self, TransitionError> {
        let FunnelState { stage, mut answers } = self;

        let stage = match (stage, event) {
            (_, FunnelEvent::Restart) => {
                answers.clear();
                FunnelStage::Hero
            }
            (FunnelStage::Hero, FunnelEvent::Start) => {
                answers.clear();
                FunnelStage::Quiz { index: 0 }
            }
            (FunnelStage::Quiz { index }, FunnelEvent::Answer { question_id, value }) => {
                let expected = bank
                    .questions()
                    .get(index)
                    .ok_or(TransitionError::Invalid {
                        stage: stage.label(),
                        event: event.label(),
                    })?;
                if expected.id != question_id {
                    return Err(TransitionError::QuestionMismatch {
                        expected: expected.id.0,
                        actual: question_id.0,
                    });
                }
                if !bank.scale().contains(value) {
                    return Err(TransitionError::InvalidOption {
                        question_id: question_id.0,
                        value,
                    });
                }

                answers.record(question_id, value);
                if index + 1 >= bank.len() {
                    FunnelStage::Diagnosing
                } else {
                    FunnelStage::Quiz { index: index + 1 }
                }
            }
            (FunnelStage::Quiz { index: 0 }, FunnelEvent::Back) => FunnelStage::Hero,
            (FunnelStage::Quiz { index }, FunnelEvent::Back) => {
                FunnelStage::Quiz { index: index - 1 }
            }
            (FunnelStage::Diagnosing, FunnelEvent::Diagnosed) => FunnelStage::Result,
            (stage, event) => {
                return Err(TransitionError::Invalid {
                    stage: stage.label(),
                    event: event.label(),
                })
            }
        };

        Ok(Self { stage, answers })
    }

    pub fn current_question<'a>(&self, bank: &'a QuestionBank) -> Option<&'a Question> {
        match self.stage {
            FunnelStage::Quiz { index } => bank.questions().get(index),
            _ => None,
        }
    }

    pub fn is_complete(&self, bank: &QuestionBank) -> bool {
        bank.questions()
            .iter()
            .all(|question| self.answers.get(question.id).is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot apply '{event}' while in the {stage} stage")]
    Invalid {
        stage: &'static str,
        event: &'static str,
    },
    #[error("expected an answer to question {expected}, got question {actual}")]
    QuestionMismatch { expected: u32, actual: u32 },
    #[error("value {value} is not an option for question {question_id}")]
    InvalidOption { question_id: u32, value: i32 },
}
