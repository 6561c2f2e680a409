//! Gemini `responseSchema` documents for the interview endpoints.

use serde_json::{json, Value};

use crate::interview::evaluation::Rating;

/// A JSON array of question strings.
pub fn question_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

/// The `{individualEvaluations, overallEvaluation}` object, ratings restricted to `Rating`.
pub fn evaluation_schema() -> Value {
    let rating = json!({
        "type": "STRING",
        "enum": Rating::ALL.iter().map(Rating::as_str).collect::<Vec<_>>()
    });
    let string_list = json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "individualEvaluations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "summary": { "type": "STRING" },
                        "rating": rating.clone()
                    },
                    "required": ["question", "summary", "rating"]
                }
            },
            "overallEvaluation": {
                "type": "OBJECT",
                "properties": {
                    "summary": { "type": "STRING" },
                    "rating": rating,
                    "strengths": string_list.clone(),
                    "areasForImprovement": string_list
                },
                "required": ["summary", "rating", "strengths", "areasForImprovement"]
            }
        },
        "required": ["individualEvaluations", "overallEvaluation"]
    })
}
