//! Axum route handlers for the Interview API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::documents::extract::extract_document;
use crate::documents::upload::parse_upload_form;
use crate::errors::AppError;
use crate::extractors::{ApiJson, ApiQuery};
use crate::interview::feedback::{
    analyze_answer, AnalyzeAnswerRequest, AnalyzeAnswerResponse, AnswerFeedback,
};
use crate::interview::questions::{
    build_prompt, build_prompt_for, generate_questions, CandidateExperience,
};
use crate::interview::sampling::{select_random, shuffle};
use crate::session::{SessionId, SessionState};
use crate::state::AppState;

const NO_UPLOAD: &str = "No upload found for this session.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub message: String,
    pub questions: Vec<String>,
    pub count: usize,
}

impl QuestionsResponse {
    fn new(message: &str, questions: Vec<String>) -> Self {
        Self {
            message: message.to_string(),
            count: questions.len(),
            questions,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    /// Return a random sample of this many stored questions.
    pub count: Option<usize>,
    /// Return every stored question in random order. Ignored when `count` is set.
    #[serde(default)]
    pub shuffle: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptionResponse {
    pub message: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackHistoryResponse {
    pub message: String,
    pub feedback: Vec<AnswerFeedback>,
    pub count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/upload
///
/// Full pipeline: multipart parse → extract both documents → build prompt →
/// generate → store in the session. The session is only written once every
/// step has succeeded.
pub async fn handle_upload(
    State(state): State<AppState>,
    session: SessionId,
    multipart: Multipart,
) -> Result<Json<QuestionsResponse>, AppError> {
    info!("Received file upload request for session {}", session.as_str());

    let form = parse_upload_form(multipart).await?;
    let experience = CandidateExperience::from_form(
        form.experience.as_deref(),
        form.years_of_experience.as_deref(),
    );

    info!("Processing job description and resume files.");
    let (job_description, resume) = tokio::try_join!(
        extract_document(form.job_description),
        extract_document(form.resume)
    )?;
    for text in [&job_description, &resume] {
        if text.content.trim().is_empty() {
            warn!("Extracted {} text is blank", text.role.field_name());
        }
    }
    info!("Job description and resume text extracted successfully.");

    let prompt = build_prompt_for(&job_description.content, &resume.content, experience.as_ref());
    let result = generate_questions(state.llm.as_ref(), &prompt).await?;

    let stored = state
        .sessions
        .commit(
            &session,
            job_description.content,
            resume.content,
            result.questions,
        )
        .await;

    Ok(Json(QuestionsResponse::new(
        "Questions generated successfully.",
        stored.generated_questions,
    )))
}

/// GET /api/questions?count=N&shuffle=true
///
/// Returns the stored questions, generating them first if the session has
/// documents but no questions. With `count`, a random sample is returned.
pub async fn handle_get_questions(
    State(state): State<AppState>,
    session: SessionId,
    ApiQuery(params): ApiQuery<QuestionsQuery>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let snapshot = load_session(&state, &session).await?;

    let (message, questions) = if snapshot.generated_questions.is_empty() {
        (
            "Questions generated and retrieved successfully.",
            regenerate(&state, &session, &snapshot).await?,
        )
    } else {
        (
            "Questions retrieved successfully.",
            snapshot.generated_questions,
        )
    };

    let questions = match (params.count, params.shuffle) {
        (Some(count), _) => select_random(&questions, count),
        (None, true) => {
            let mut questions = questions;
            shuffle(&mut questions);
            questions
        }
        (None, false) => questions,
    };

    Ok(Json(QuestionsResponse::new(message, questions)))
}

/// POST /api/questions/regenerate
pub async fn handle_regenerate_questions(
    State(state): State<AppState>,
    session: SessionId,
) -> Result<Json<QuestionsResponse>, AppError> {
    let snapshot = load_session(&state, &session).await?;
    let questions = regenerate(&state, &session, &snapshot).await?;
    Ok(Json(QuestionsResponse::new(
        "Questions regenerated successfully.",
        questions,
    )))
}

/// GET /api/job-description
pub async fn handle_get_job_description(
    State(state): State<AppState>,
    session: SessionId,
) -> Result<Json<JobDescriptionResponse>, AppError> {
    let snapshot = load_session(&state, &session).await?;
    Ok(Json(JobDescriptionResponse {
        message: "Job description retrieved successfully.".to_string(),
        job_description: snapshot.job_description_text,
    }))
}

/// POST /api/analyze-answer
///
/// Grades the answer and appends it to the session's feedback history.
pub async fn handle_analyze_answer(
    State(state): State<AppState>,
    session: SessionId,
    ApiJson(request): ApiJson<AnalyzeAnswerRequest>,
) -> Result<Json<AnalyzeAnswerResponse>, AppError> {
    let question = request.question.trim();
    let answer = request.answer.trim();
    if question.is_empty() || answer.is_empty() {
        return Err(AppError::validation("Question and answer are required."));
    }

    let snapshot = load_session(&state, &session).await?;
    let feedback = analyze_answer(
        state.llm.as_ref(),
        &snapshot.job_description_text,
        &snapshot.resume_text,
        question,
        answer,
    )
    .await?;

    let entry = AnswerFeedback::new(question, answer, feedback.as_str());
    if !state.sessions.record_feedback(&session, entry).await {
        return Err(AppError::not_found(NO_UPLOAD));
    }

    Ok(Json(AnalyzeAnswerResponse { feedback }))
}

/// GET /api/feedback
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    session: SessionId,
) -> Result<Json<FeedbackHistoryResponse>, AppError> {
    let snapshot = load_session(&state, &session).await?;
    Ok(Json(FeedbackHistoryResponse {
        message: "Feedback retrieved successfully.".to_string(),
        count: snapshot.feedback_history.len(),
        feedback: snapshot.feedback_history,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_session(state: &AppState, session: &SessionId) -> Result<SessionState, AppError> {
    state
        .sessions
        .get(session)
        .await
        .ok_or_else(|| AppError::not_found(NO_UPLOAD))
}

/// Generates from the snapshot's documents and stores the result. If the
/// session was re-uploaded meanwhile, its current questions are returned
/// instead; if it was evicted, the request fails with 404.
async fn regenerate(
    state: &AppState,
    session: &SessionId,
    snapshot: &SessionState,
) -> Result<Vec<String>, AppError> {
    let prompt = build_prompt(&snapshot.job_description_text, &snapshot.resume_text);
    let result = generate_questions(state.llm.as_ref(), &prompt).await?;

    match state
        .sessions
        .set_questions(session, snapshot.revision, result.questions)
        .await
    {
        Some(questions) => Ok(questions),
        None => {
            warn!(
                "Session {} changed while regenerating; discarding stale questions",
                session.as_str()
            );
            Ok(load_session(state, session).await?.generated_questions)
        }
    }
}
