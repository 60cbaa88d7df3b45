//! Static question bank the scoring engine partitions answers over.
//!
//! A bank is validated once at construction so that every category holds the same number of
//! questions; level thresholds are relative to the category maximum and would be meaningless
//! otherwise.

mod copy;
mod parser;

pub use copy::category_copy;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::domain::{Category, OptionScale, Question, QuestionId};

/// Ordered, validated list of questions sharing one option scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
    scale: OptionScale,
    per_category: usize,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>, scale: OptionScale) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }

        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(QuestionBankError::DuplicateQuestion(question.id.0));
            }
        }

        if !scale.contains(scale.sentinel()) {
            return Err(QuestionBankError::MissingSentinel(scale.sentinel()));
        }
        if scale.max_value() == 0 {
            return Err(QuestionBankError::NoScoringOptions);
        }

        let mut expected = None;
        for category in Category::ALL {
            let count = questions
                .iter()
                .filter(|question| question.category == category)
                .count();
            if count == 0 {
                return Err(QuestionBankError::MissingCategory(category));
            }
            match expected {
                None => expected = Some(count),
                Some(expected) if expected != count => {
                    return Err(QuestionBankError::UnevenCategories {
                        category,
                        expected,
                        actual: count,
                    });
                }
                Some(_) => {}
            }
        }

        let per_category = expected.unwrap_or_default();
        let max_total = u32::try_from(per_category)
            .ok()
            .and_then(|count| count.checked_mul(scale.max_value()))
            .and_then(|category_max| category_max.checked_mul(Category::ALL.len() as u32));
        if max_total.is_none() {
            return Err(QuestionBankError::ScoreRangeOverflow {
                per_category,
                max_value: scale.max_value(),
            });
        }

        Ok(Self {
            questions,
            scale,
            per_category,
        })
    }

    /// The built-in twenty question battery, five per category.
    pub fn standard() -> Self {
        let questions = STANDARD_QUESTIONS
            .iter()
            .enumerate()
            .map(|(index, (category, text))| Question {
                id: QuestionId(index as u32 + 1),
                category: *category,
                text: (*text).to_string(),
            })
            .collect();

        Self {
            questions,
            scale: OptionScale::likert(),
            per_category: STANDARD_QUESTIONS.len() / Category::ALL.len(),
        }
    }

    /// Loads `id,category,text` rows and applies the standard option scale.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, QuestionBankError> {
        let questions = parser::parse_questions(reader)?;
        Self::new(questions, OptionScale::likert())
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, QuestionBankError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    /// Zero-based position of a question in the quiz order.
    pub fn position(&self, id: QuestionId) -> Option<usize> {
        self.questions.iter().position(|question| question.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn scale(&self) -> &OptionScale {
        &self.scale
    }

    pub fn questions_in(&self, category: Category) -> impl Iterator<Item = &Question> + '_ {
        self.questions
            .iter()
            .filter(move |question| question.category == category)
    }

    pub fn questions_per_category(&self) -> usize {
        self.per_category
    }

    pub fn category_max(&self) -> u32 {
        self.per_category as u32 * self.scale.max_value()
    }

    pub fn max_total(&self) -> u32 {
        self.category_max() * Category::ALL.len() as u32
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionBankError {
    #[error("question bank is empty")]
    Empty,
    #[error("question id {0} appears more than once")]
    DuplicateQuestion(u32),
    #[error("no questions for category {}", .0.label())]
    MissingCategory(Category),
    #[error(
        "category {} has {actual} questions, expected {expected}",
        .category.label()
    )]
    UnevenCategories {
        category: Category,
        expected: usize,
        actual: usize,
    },
    #[error("option scale is missing the unsure value {0}")]
    MissingSentinel(i32),
    #[error("option scale has no positive scoring option")]
    NoScoringOptions,
    #[error(
        "{per_category} questions per category with a top value of {max_value} overflow the score range"
    )]
    ScoreRangeOverflow { per_category: usize, max_value: u32 },
    #[error("row {row}: unknown category '{value}'")]
    UnknownCategory { row: usize, value: String },
    #[error("invalid question bank CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
}

const STANDARD_QUESTIONS: [(Category, &str); 20] = [
    (
        Category::Appearance,
        "Do you choose clothes that fit your body well rather than what is convenient?",
    ),
    (
        Category::Appearance,
        "Do you keep a regular grooming routine for hair, skin and nails?",
    ),
    (
        Category::Appearance,
        "Do you pay attention to your posture when standing and walking?",
    ),
    (
        Category::Appearance,
        "Do you update your wardrobe or hairstyle when your style feels dated?",
    ),
    (
        Category::Appearance,
        "Do you check how you look before meeting people?",
    ),
    (
        Category::Conversation,
        "Can you keep a conversation going with someone you just met?",
    ),
    (
        Category::Conversation,
        "Do you ask follow-up questions about what the other person said?",
    ),
    (
        Category::Conversation,
        "Do you share stories about yourself that invite a response?",
    ),
    (
        Category::Conversation,
        "Do you adjust your tone and topic to the person you are talking to?",
    ),
    (
        Category::Conversation,
        "Do people tell you they enjoyed talking with you?",
    ),
    (
        Category::SocialPresence,
        "Do you join events or communities where you can meet new people?",
    ),
    (
        Category::SocialPresence,
        "Do you keep in touch with acquaintances without a special reason?",
    ),
    (
        Category::SocialPresence,
        "Do your social media profiles show what you enjoy in life?",
    ),
    (
        Category::SocialPresence,
        "Do friends introduce you to people in their circle?",
    ),
    (
        Category::SocialPresence,
        "Do you take the first step to invite someone out?",
    ),
    (
        Category::Mindset,
        "Do you recover quickly when an invitation is turned down?",
    ),
    (
        Category::Mindset,
        "Do you feel comfortable being yourself on a first date?",
    ),
    (
        Category::Mindset,
        "Do you set concrete goals for improving yourself?",
    ),
    (
        Category::Mindset,
        "Do you believe you can become more attractive with effort?",
    ),
    (
        Category::Mindset,
        "Do you enjoy your days even when you are not dating anyone?",
    ),
];
