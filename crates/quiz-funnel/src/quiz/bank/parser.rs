use super::QuestionBankError;
use crate::quiz::domain::{Category, Question, QuestionId};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct QuestionRow {
    id: u32,
    category: String,
    text: String,
}

pub(crate) fn parse_questions<R: Read>(reader: R) -> Result<Vec<Question>, QuestionBankError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut questions = Vec::new();

    for (index, record) in csv_reader.deserialize::<QuestionRow>().enumerate() {
        let row = record?;
        let category =
            Category::parse(&row.category).ok_or_else(|| QuestionBankError::UnknownCategory {
                row: index + 1,
                value: row.category.clone(),
            })?;

        questions.push(Question {
            id: QuestionId(row.id),
            category,
            text: row.text,
        });
    }

    Ok(questions)
}
