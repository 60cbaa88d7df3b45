use super::common::*;
use crate::quiz::bank::QuestionBank;
use crate::quiz::domain::{Answers, Category, Level, OptionScale, Question, QuestionId, Summary};
use crate::quiz::persona::PersonaId;
use crate::quiz::scoring::{
    LevelThresholds, PersonaBands, ScoringConfig, ScoringConfigError, ScoringEngine,
};

fn summary_with_total(total_score: u32) -> Summary {
    Summary {
        categories: Vec::new(),
        total_score,
        max_total: 60,
    }
}

#[test]
fn summary_is_deterministic() {
    let bank = bank();
    let engine = engine();
    let answers = answers_by_category(
        &bank,
        &[
            (Category::Appearance, [3, 2, -1, 0, 1]),
            (Category::Mindset, [2, 2, 2, 2, 2]),
        ],
    );

    let first = engine.compute_summary(&answers, &bank);
    let second = engine.compute_summary(&answers, &bank);

    assert_eq!(first, second);
    assert_eq!(engine.score(&answers, &bank), engine.score(&answers, &bank));
}

#[test]
fn unsure_and_missing_answers_score_zero() {
    let bank = bank();
    let engine = engine();

    for answers in [Answers::new(), uniform_answers(&bank, -1)] {
        let outcome = engine.score(&answers, &bank);
        assert_eq!(outcome.summary.total_score, 0);
        assert_eq!(outcome.summary.categories.len(), 4);
        for result in &outcome.summary.categories {
            assert_eq!(result.score, 0);
            assert_eq!(result.level, Level::Red);
        }
        assert_eq!(outcome.fallback_persona, PersonaId::Rebuilder);
    }
}

#[test]
fn maximum_answers_reach_the_ceiling() {
    let bank = bank();
    let outcome = engine().score(&uniform_answers(&bank, 3), &bank);

    assert_eq!(outcome.summary.total_score, 60);
    assert_eq!(outcome.summary.max_total, 60);
    for result in &outcome.summary.categories {
        assert_eq!(result.score, 15);
        assert_eq!(result.max_score, 15);
        assert_eq!(result.level, Level::Green);
    }
    assert_eq!(outcome.fallback_persona, PersonaId::AllRounder);
}

#[test]
fn categories_follow_display_order() {
    let bank = bank();
    let summary = engine().compute_summary(&Answers::new(), &bank);
    let order: Vec<Category> = summary
        .categories
        .iter()
        .map(|result| result.category)
        .collect();
    assert_eq!(order, Category::ALL.to_vec());
}

#[test]
fn total_is_sum_of_partial_categories() {
    let bank = bank();
    let engine = engine();
    let mut answers = Answers::new();

    for (step, question) in bank.questions().iter().enumerate() {
        answers.record(question.id, (step % 5) as i32 - 1);
        let summary = engine.compute_summary(&answers, &bank);
        let sum: u32 = summary.categories.iter().map(|result| result.score).sum();
        assert_eq!(summary.total_score, sum, "after {} answers", step + 1);
    }
}

#[test]
fn levels_are_classified_per_category() {
    let bank = bank();
    let answers = answers_by_category(
        &bank,
        &[
            (Category::Appearance, [3, 3, 2, 0, 0]),
            (Category::Conversation, [3, 3, 2, 0, 0]),
            (Category::SocialPresence, [3, 3, 2, 0, 0]),
            (Category::Mindset, [3, 3, 3, 3, 2]),
        ],
    );

    let outcome = engine().score(&answers, &bank);
    let summary = &outcome.summary;

    for category in [
        Category::Appearance,
        Category::Conversation,
        Category::SocialPresence,
    ] {
        let result = summary.category(category).expect("category present");
        assert_eq!(result.score, 8);
        assert_eq!(result.level, Level::Yellow);
    }
    let mindset = summary.category(Category::Mindset).expect("mindset present");
    assert_eq!(mindset.score, 14);
    assert_eq!(mindset.level, Level::Green);

    assert_eq!(summary.total_score, 38);
    assert_eq!(outcome.fallback_persona, PersonaId::Polished);
}

#[test]
fn level_boundaries_on_fifteen_point_categories() {
    let bank = bank();
    let engine = engine();
    let cases = [
        ([3, 3, 3, 3, 0], 12, Level::Green),
        ([3, 3, 3, 2, 0], 11, Level::Yellow),
        ([3, 3, 2, 0, 0], 8, Level::Yellow),
        ([3, 3, 1, 0, 0], 7, Level::Red),
        ([0, 0, 0, 0, 0], 0, Level::Red),
    ];

    for (values, score, level) in cases {
        let answers = answers_by_category(&bank, &[(Category::Conversation, values)]);
        let summary = engine.compute_summary(&answers, &bank);
        let result = summary
            .category(Category::Conversation)
            .expect("conversation present");
        assert_eq!(result.score, score);
        assert_eq!(result.level, level, "score {score}");
        assert!(!result.description.is_empty());
        assert!(!result.suggestion.is_empty());
    }
}

#[test]
fn out_of_range_values_are_clamped() {
    let bank = bank();
    let answers = answers_by_category(&bank, &[(Category::Appearance, [7, -5, 3, -1, 0])]);
    let mut answers = answers;
    answers.record(QuestionId(999), 3);

    let summary = engine().compute_summary(&answers, &bank);
    assert_eq!(
        summary
            .category(Category::Appearance)
            .map(|result| result.score),
        Some(6)
    );
    assert_eq!(summary.total_score, 6);
}

#[test]
fn fallback_persona_covers_every_total() {
    let engine = engine();
    for total in 0..=60 {
        let persona = engine.compute_fallback_persona(&summary_with_total(total));
        assert!(PersonaId::ALL.contains(&persona), "total {total}");
    }
}

#[test]
fn fallback_persona_bands_follow_priority() {
    let engine = engine();
    let cases = [
        (60, PersonaId::AllRounder),
        (48, PersonaId::AllRounder),
        (47, PersonaId::Polished),
        (36, PersonaId::Polished),
        (35, PersonaId::Balanced),
        (19, PersonaId::Balanced),
        (18, PersonaId::Rebuilder),
        (0, PersonaId::Rebuilder),
    ];

    for (total, expected) in cases {
        assert_eq!(
            engine.compute_fallback_persona(&summary_with_total(total)),
            expected,
            "total {total}"
        );
    }
}

#[test]
fn custom_thresholds_change_classification() {
    let bank = bank();
    let config = ScoringConfig {
        levels: LevelThresholds {
            green_percent: 90,
            yellow_percent: 60,
        },
        ..ScoringConfig::canonical()
    };
    let engine = ScoringEngine::new(config).expect("valid config");
    let answers = answers_by_category(
        &bank,
        &[
            (Category::Appearance, [3, 3, 2, 0, 0]),
            (Category::Mindset, [3, 3, 3, 3, 2]),
        ],
    );

    let summary = engine.compute_summary(&answers, &bank);
    assert_eq!(
        summary.category(Category::Appearance).map(|r| r.level),
        Some(Level::Red)
    );
    assert_eq!(
        summary.category(Category::Mindset).map(|r| r.level),
        Some(Level::Green)
    );
}

#[test]
fn rejects_unordered_configuration() {
    let levels = ScoringConfig {
        levels: LevelThresholds {
            green_percent: 50,
            yellow_percent: 70,
        },
        ..ScoringConfig::canonical()
    };
    assert_eq!(
        ScoringEngine::new(levels).map(|_| ()),
        Err(ScoringConfigError::LevelOrder {
            yellow: 70,
            green: 50
        })
    );

    let personas = ScoringConfig {
        personas: PersonaBands {
            all_rounder_percent: 80,
            polished_percent: 40,
            rebuild_percent: 40,
        },
        ..ScoringConfig::canonical()
    };
    assert!(matches!(
        ScoringEngine::new(personas),
        Err(ScoringConfigError::PersonaBandOrder { .. })
    ));
}

#[test]
fn thresholds_scale_with_question_count() {
    let questions = Category::ALL
        .iter()
        .flat_map(|category| std::iter::repeat(*category).take(4))
        .enumerate()
        .map(|(index, category)| Question {
            id: QuestionId(index as u32 + 100),
            category,
            text: format!("question {index}"),
        })
        .collect();
    let bank = QuestionBank::new(questions, OptionScale::likert()).expect("balanced bank");
    assert_eq!(bank.category_max(), 12);
    assert_eq!(bank.max_total(), 48);

    let mut answers = Answers::new();
    for (question, value) in bank.questions_in(Category::Appearance).zip([3, 3, 3, 1]) {
        answers.record(question.id, value);
    }
    for (question, value) in bank.questions_in(Category::Mindset).zip([3, 3, 0, 0]) {
        answers.record(question.id, value);
    }

    let summary = engine().compute_summary(&answers, &bank);
    assert_eq!(
        summary.category(Category::Appearance).map(|r| r.level),
        Some(Level::Green)
    );
    assert_eq!(
        summary.category(Category::Mindset).map(|r| r.level),
        Some(Level::Yellow)
    );
    assert_eq!(summary.max_total, 48);
}
