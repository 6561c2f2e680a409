//! Question generator — turns a job description and a CV into interview questions.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{AppError, Operation};
use crate::interview::prompts::{fill_template, QUESTION_PROMPT_TEMPLATE};
use crate::interview::schema::question_list_schema;
use crate::llm_client::{generate_json, TextGenerator};

pub const MISSING_FIELDS_MESSAGE: &str = "Both jobDescription and cvDetails are required.";

/// Raw request body. Fields stay untyped so a wrong type is reported as a
/// validation error instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsBody {
    pub job_description: Option<Value>,
    pub cv_details: Option<Value>,
}

/// A validated question generation request.
#[derive(Debug, Clone)]
pub struct QuestionRequest {
    pub job_description: String,
    pub cv_details: String,
}

impl GenerateQuestionsBody {
    pub fn validate(self) -> Result<QuestionRequest, AppError> {
        match (
            non_empty_string(self.job_description),
            non_empty_string(self.cv_details),
        ) {
            (Some(job_description), Some(cv_details)) => Ok(QuestionRequest {
                job_description,
                cv_details,
            }),
            _ => Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string())),
        }
    }
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

pub fn build_question_prompt(request: &QuestionRequest, question_count: usize) -> String {
    let count = question_count.to_string();
    fill_template(
        QUESTION_PROMPT_TEMPLATE,
        &[
            ("job_description", request.job_description.as_str()),
            ("cv_details", request.cv_details.as_str()),
            ("question_count", count.as_str()),
        ],
    )
}

/// Generates questions for a validated request.
///
/// The model is asked for exactly `question_count` questions; blank entries are
/// dropped and any surplus is cut so the caller never receives more than asked.
pub async fn generate_questions(
    llm: &dyn TextGenerator,
    request: &QuestionRequest,
    question_count: usize,
) -> Result<Vec<String>, AppError> {
    let prompt = build_question_prompt(request, question_count);

    let questions: Vec<String> = generate_json(llm, &prompt, &question_list_schema())
        .await
        .map_err(|e| AppError::from_llm(Operation::GenerateQuestions, e))?;

    Ok(select_questions(questions, question_count))
}

/// Keeps the first `count` non-blank questions. Truncation is deterministic;
/// any random choice is left to the model.
fn select_questions(questions: Vec<String>, count: usize) -> Vec<String> {
    questions
        .into_iter()
        .filter(|q| !q.trim().is_empty())
        .take(count)
        .collect()
}
