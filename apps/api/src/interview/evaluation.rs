//! Answer evaluator — grades interview answers against the expectations of a role.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, Operation};
use crate::interview::prompts::{fill_template, EVALUATION_PROMPT_TEMPLATE};
use crate::interview::schema::evaluation_schema;
use crate::llm_client::{generate_json, TextGenerator};

pub const INVALID_INTERVIEW_DATA_MESSAGE: &str =
    r#"Request body must contain a non-empty "interviewData" array."#;
pub const INVALID_JOB_TITLE_MESSAGE: &str =
    r#"Request body must contain a valid "jobTitle" string."#;

/// The closed rating scale shared by per-answer and overall evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Good,
    Average,
    #[serde(rename = "Below Average")]
    BelowAverage,
    Poor,
}

impl Rating {
    pub const ALL: [Rating; 5] = [
        Rating::Excellent,
        Rating::Good,
        Rating::Average,
        Rating::BelowAverage,
        Rating::Poor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::BelowAverage => "Below Average",
            Rating::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualEvaluation {
    pub question: String,
    pub summary: String,
    pub rating: Rating,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallEvaluation {
    pub summary: String,
    pub rating: Rating,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub individual_evaluations: Vec<IndividualEvaluation>,
    pub overall_evaluation: OverallEvaluation,
}

/// Raw request body; validated into `EvaluationRequest`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateAnswersBody {
    pub interview_data: Option<Value>,
    pub job_title: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    /// Question/answer items exactly as the client sent them, extra keys included.
    pub interview_data: Vec<Value>,
    /// As sent; only the blank check trims.
    pub job_title: String,
}

impl EvaluateAnswersBody {
    /// `interviewData` is checked before `jobTitle`.
    pub fn validate(self) -> Result<EvaluationRequest, AppError> {
        let interview_data = match self.interview_data {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Err(invalid(INVALID_INTERVIEW_DATA_MESSAGE)),
        };

        let job_title = match self.job_title {
            Some(Value::String(title)) if !title.trim().is_empty() => title,
            _ => return Err(invalid(INVALID_JOB_TITLE_MESSAGE)),
        };

        Ok(EvaluationRequest {
            interview_data,
            job_title,
        })
    }
}

fn invalid(message: &str) -> AppError {
    AppError::Validation(message.to_string())
}

pub fn build_evaluation_prompt(request: &EvaluationRequest) -> Result<String, AppError> {
    let interview_data = serde_json::to_string_pretty(&request.interview_data)
        .context("Failed to serialize interview data")?;

    Ok(fill_template(
        EVALUATION_PROMPT_TEMPLATE,
        &[
            ("job_title", request.job_title.as_str()),
            ("interview_data", interview_data.as_str()),
        ],
    ))
}

/// Evaluates every answer plus the interview as a whole.
pub async fn evaluate_answers(
    llm: &dyn TextGenerator,
    request: &EvaluationRequest,
) -> Result<EvaluationResult, AppError> {
    let prompt = build_evaluation_prompt(request)?;

    generate_json(llm, &prompt, &evaluation_schema())
        .await
        .map_err(|e| AppError::from_llm(Operation::EvaluateAnswers, e))
}
