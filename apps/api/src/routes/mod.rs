pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/interview/generate-questions",
            post(handlers::handle_generate_questions),
        )
        .route(
            "/api/interview/evaluate-answers",
            post(handlers::handle_evaluate_answers),
        )
        .layer(body_limit)
        .with_state(state)
}
