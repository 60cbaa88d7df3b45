use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Thematic dimension measured by the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Appearance,
    Conversation,
    SocialPresence,
    Mindset,
}

impl Category {
    /// Fixed display order used for summaries and chart axes.
    pub const ALL: [Category; 4] = [
        Category::Appearance,
        Category::Conversation,
        Category::SocialPresence,
        Category::Mindset,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Category::Appearance => "appearance",
            Category::Conversation => "conversation",
            Category::SocialPresence => "social_presence",
            Category::Mindset => "mindset",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Category::Appearance => "Appearance",
            Category::Conversation => "Conversation",
            Category::SocialPresence => "Social presence",
            Category::Mindset => "Mindset",
        }
    }

    /// Case-insensitive lookup accepting either the label or the display name.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Category::ALL
            .into_iter()
            .find(|category| category.label() == normalized)
    }
}

/// Stable identifier of a question within a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub category: Category,
    pub text: String,
}

/// One point on the option scale shared by every question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: i32,
    pub label: String,
}

/// Ordered option list plus the value reserved for "unsure".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionScale {
    options: Vec<AnswerOption>,
    sentinel: i32,
}

impl OptionScale {
    pub fn new(options: Vec<AnswerOption>, sentinel: i32) -> Self {
        Self { options, sentinel }
    }

    /// Five-point scale with `-1` meaning "not sure".
    pub fn likert() -> Self {
        let options = [
            (-1, "Not sure"),
            (0, "Not at all"),
            (1, "Rarely"),
            (2, "Sometimes"),
            (3, "Always"),
        ]
        .into_iter()
        .map(|(value, label)| AnswerOption {
            value,
            label: label.to_string(),
        })
        .collect();

        Self::new(options, -1)
    }

    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    pub fn sentinel(&self) -> i32 {
        self.sentinel
    }

    pub fn is_sentinel(&self, value: i32) -> bool {
        value == self.sentinel
    }

    pub fn contains(&self, value: i32) -> bool {
        self.options.iter().any(|option| option.value == value)
    }

    pub fn label_for(&self, value: i32) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }

    /// Highest scoring weight on the scale, ignoring the sentinel.
    pub fn max_value(&self) -> u32 {
        self.options
            .iter()
            .filter(|option| option.value != self.sentinel)
            .map(|option| option.value.max(0) as u32)
            .max()
            .unwrap_or(0)
    }
}

/// Answers collected so far, keyed by question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers(BTreeMap<QuestionId, i32>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = AnswerEntry>,
    {
        Self(
            entries
                .into_iter()
                .map(|entry| (entry.question_id, entry.value))
                .collect(),
        )
    }

    /// Records (or replaces) the answer for a question.
    pub fn record(&mut self, question_id: QuestionId, value: i32) {
        self.0.insert(question_id, value);
    }

    pub fn get(&self, question_id: QuestionId) -> Option<i32> {
        self.0.get(&question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn entries(&self) -> Vec<AnswerEntry> {
        self.0
            .iter()
            .map(|(question_id, value)| AnswerEntry {
                question_id: *question_id,
                value: *value,
            })
            .collect()
    }
}

/// Flat wire representation of a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub question_id: QuestionId,
    pub value: i32,
}

/// Traffic-light classification of a category score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Red,
    Yellow,
    Green,
}

impl Level {
    pub const fn label(self) -> &'static str {
        match self {
            Level::Red => "red",
            Level::Yellow => "yellow",
            Level::Green => "green",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: Category,
    pub score: u32,
    pub max_score: u32,
    pub level: Level,
    pub description: String,
    pub suggestion: String,
}

/// Per-category results in display order plus their total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub categories: Vec<CategoryResult>,
    pub total_score: u32,
    pub max_total: u32,
}

impl Summary {
    pub fn category(&self, category: Category) -> Option<&CategoryResult> {
        self.categories
            .iter()
            .find(|result| result.category == category)
    }

    pub fn levels(&self) -> impl Iterator<Item = (Category, Level)> + '_ {
        self.categories
            .iter()
            .map(|result| (result.category, result.level))
    }
}
