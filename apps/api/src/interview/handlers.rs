//! Axum route handlers for the Interview API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::debug;

use crate::errors::AppError;
use crate::interview::evaluation::{evaluate_answers, EvaluateAnswersBody, EvaluationResult};
use crate::interview::questions::{generate_questions, GenerateQuestionsBody};
use crate::state::AppState;

/// POST /api/interview/generate-questions
///
/// Generates interview questions linking the candidate's CV to the job description.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    payload: Result<Json<GenerateQuestionsBody>, JsonRejection>,
) -> Result<Json<Vec<String>>, AppError> {
    let request = body_or_default(payload)?.validate()?;

    let questions = generate_questions(
        state.llm.as_ref(),
        &request,
        state.config.question_count,
    )
    .await?;

    Ok(Json(questions))
}

/// POST /api/interview/evaluate-answers
///
/// Rates each answer and the interview overall, calibrated to the job title.
pub async fn handle_evaluate_answers(
    State(state): State<AppState>,
    payload: Result<Json<EvaluateAnswersBody>, JsonRejection>,
) -> Result<Json<EvaluationResult>, AppError> {
    let request = body_or_default(payload)?.validate()?;

    let evaluation = evaluate_answers(state.llm.as_ref(), &request).await?;

    Ok(Json(evaluation))
}

/// A body that is not a JSON object is validated as an empty one, so callers
/// get the endpoint's own field message. Bodies axum could not read at all
/// (e.g. over the size limit) keep the rejection's own status.
fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(
            rejection @ (JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_)),
        ) => {
            debug!("Treating unparseable request body as empty: {rejection}");
            Ok(T::default())
        }
        Err(rejection) => Err(AppError::Rejected(rejection)),
    }
}
