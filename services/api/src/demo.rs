use crate::infra::{build_service, parse_answer};
use chrono::Utc;
use clap::Args;
use quiz_funnel::error::AppError;
use quiz_funnel::quiz::{
    AnswerEntry, Answers, Category, FunnelSettings, LeadSubmission, QuestionBank, QuizReport,
    ScoreOutcome, ScoringEngine, Summary,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct QuestionsArgs {
    /// CSV question bank (id,category,text). Defaults to the built-in bank.
    #[arg(long)]
    pub(crate) bank: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Answer as QUESTION_ID=VALUE; repeat for each answered question
    #[arg(long = "answer", value_parser = parse_answer, conflicts_with = "all")]
    pub(crate) answers: Vec<AnswerEntry>,
    /// Answer every question with the same value
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) all: Option<i32>,
    /// CSV question bank (id,category,text). Defaults to the built-in bank.
    #[arg(long)]
    pub(crate) bank: Option<PathBuf>,
    /// Print the outcome as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// One answer value per category (appearance,conversation,social presence,mindset)
    #[arg(long, value_parser = parse_category_values, default_value = "3,1,2,3")]
    pub(crate) values: [i32; 4],
    /// Email used for the lead capture step
    #[arg(long, default_value = "visitor@example.com")]
    pub(crate) email: String,
    /// Stop after the result page
    #[arg(long)]
    pub(crate) skip_lead: bool,
    /// CSV question bank (id,category,text). Defaults to the built-in bank.
    #[arg(long)]
    pub(crate) bank: Option<PathBuf>,
}

fn parse_category_values(raw: &str) -> Result<[i32; 4], String> {
    let values = raw
        .split(',')
        .map(|part| {
            let value = part
                .trim()
                .parse::<i32>()
                .map_err(|err| format!("invalid value '{part}' ({err})"))?;
            if (-1..=3).contains(&value) {
                Ok(value)
            } else {
                Err(format!("value {value} is outside -1..=3"))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    values
        .try_into()
        .map_err(|values: Vec<i32>| format!("expected 4 values, got {}", values.len()))
}

fn load_bank(path: Option<PathBuf>) -> Result<QuestionBank, AppError> {
    match path {
        Some(path) => Ok(QuestionBank::from_csv_path(path)?),
        None => Ok(QuestionBank::standard()),
    }
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let bank = load_bank(args.bank)?;

    println!(
        "{} questions, {} per category (max {} per category, {} total)",
        bank.len(),
        bank.questions_per_category(),
        bank.category_max(),
        bank.max_total()
    );
    for category in Category::ALL {
        println!("\n{}", category.display_name());
        for question in bank.questions_in(category) {
            println!("  [{:>3}] {}", question.id.0, question.text);
        }
    }

    println!("\nAnswer scale:");
    for option in bank.scale().options() {
        let marker = if bank.scale().is_sentinel(option.value) {
            " (scores zero)"
        } else {
            ""
        };
        println!("  {:>2} = {}{}", option.value, option.label, marker);
    }

    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        answers,
        all,
        bank,
        json,
    } = args;
    let bank = load_bank(bank)?;

    let answers = match all {
        Some(value) => {
            let mut uniform = Answers::new();
            for question in bank.questions() {
                uniform.record(question.id, value);
            }
            uniform
        }
        None => Answers::from_entries(answers),
    };

    let outcome = ScoringEngine::canonical().score(&answers, &bank);
    if json {
        let rendered = serde_json::to_string_pretty(&outcome).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_outcome(&outcome, answers.len(), bank.len());
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        values,
        email,
        skip_lead,
        bank,
    } = args;
    let bank = load_bank(bank)?;
    let (service, outbox) = build_service(bank, FunnelSettings::default());
    let now = Utc::now();

    println!("Quiz funnel demo");
    let record = service.create_session(now)?;
    println!("- Visitor lands on the hero page (session {})", record.id.0);

    let questions: Vec<_> = service
        .bank()
        .questions()
        .iter()
        .map(|question| (question.id, question.category))
        .collect();
    service.start(&record.id)?;
    for (question_id, category) in &questions {
        let index = Category::ALL
            .iter()
            .position(|candidate| candidate == category)
            .unwrap_or_default();
        service.answer(&record.id, *question_id, values[index])?;
    }
    println!("- Answered {} questions", questions.len());

    let report = service.diagnose(&record.id, now)?;
    render_report(&report);

    if skip_lead {
        return Ok(());
    }

    let lead = service.capture_lead(&record.id, LeadSubmission { email, name: None }, now)?;
    println!(
        "\nLead captured for {} ({} queued in the outbox)",
        lead.email,
        outbox.events().len()
    );

    Ok(())
}

fn render_summary(summary: &Summary) {
    for result in &summary.categories {
        println!(
            "  {:<16} {:>2}/{:<2} {:<6} {}",
            result.category.display_name(),
            result.score,
            result.max_score,
            result.level.label(),
            result.description
        );
    }
    println!(
        "  {:<16} {:>2}/{}",
        "Total", summary.total_score, summary.max_total
    );
}

fn render_outcome(outcome: &ScoreOutcome, answered: usize, total_questions: usize) {
    println!("Scored {answered} of {total_questions} answers");
    render_summary(&outcome.summary);
    let profile = outcome.fallback_persona.profile();
    println!(
        "Fallback persona: {} ({})",
        profile.title,
        outcome.fallback_persona.as_str()
    );
}

fn render_report(report: &QuizReport) {
    println!("\nResult: {}", report.narrative.headline);
    println!(
        "Persona: {} ({}, via {:?})",
        report.profile.title,
        report.persona.as_str(),
        report.narrative.source
    );
    render_summary(&report.summary);
    for section in &report.narrative.sections {
        println!("\n{}\n  {}", section.title, section.body);
    }
    println!("\nNext step: {}", report.sales_page_url);
}
