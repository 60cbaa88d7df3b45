use super::config::LevelThresholds;
use crate::quiz::bank::{category_copy, QuestionBank};
use crate::quiz::domain::{Answers, Category, CategoryResult, Level, OptionScale, Summary};

pub(crate) fn summarize(
    answers: &Answers,
    bank: &QuestionBank,
    thresholds: &LevelThresholds,
) -> Summary {
    let scale = bank.scale();
    let category_max = bank.category_max();

    let categories: Vec<CategoryResult> = Category::ALL
        .into_iter()
        .map(|category| {
            let score = bank
                .questions_in(category)
                .filter_map(|question| answers.get(question.id))
                .map(|value| weight(value, scale))
                .sum();
            let level = classify(score, category_max, thresholds);
            let (description, suggestion) = category_copy(category, level);

            CategoryResult {
                category,
                score,
                max_score: category_max,
                level,
                description: description.to_string(),
                suggestion: suggestion.to_string(),
            }
        })
        .collect();

    let total_score = categories.iter().map(|result| result.score).sum();

    Summary {
        categories,
        total_score,
        max_total: bank.max_total(),
    }
}

/// Scoring weight of a raw answer: unsure and negative values count as zero, values past the
/// top of the scale count as its maximum.
pub(crate) fn weight(value: i32, scale: &OptionScale) -> u32 {
    if scale.is_sentinel(value) || value <= 0 {
        return 0;
    }
    (value as u32).min(scale.max_value())
}

pub(crate) fn classify(score: u32, category_max: u32, thresholds: &LevelThresholds) -> Level {
    let scaled = u64::from(score) * 100;
    let max = u64::from(category_max);

    if scaled >= max * u64::from(thresholds.green_percent) {
        Level::Green
    } else if scaled >= max * u64::from(thresholds.yellow_percent) {
        Level::Yellow
    } else {
        Level::Red
    }
}
