pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::recordings::handle_upload_audio;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Documents → questions
        .route("/api/upload", post(handlers::handle_upload))
        .route("/api/questions", get(handlers::handle_get_questions))
        .route(
            "/api/questions/regenerate",
            post(handlers::handle_regenerate_questions),
        )
        .route(
            "/api/job-description",
            get(handlers::handle_get_job_description),
        )
        .route("/api/analyze-answer", post(handlers::handle_analyze_answer))
        .route("/api/feedback", get(handlers::handle_get_feedback))
        // Recordings
        .route("/api/upload-audio", post(handle_upload_audio))
        .layer(body_limit)
        .with_state(state)
}
