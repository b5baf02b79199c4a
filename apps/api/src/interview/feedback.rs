//! Grades a candidate's answer with the provider, against the session's job
//! description and résumé.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::interview::prompts::{fill_template, ANSWER_ANALYSIS_PROMPT_TEMPLATE};
use crate::llm_client::prompts::COACH_PERSONA;
use crate::llm_client::{LlmError, LlmProvider};

#[derive(Debug, Deserialize)]
pub struct AnalyzeAnswerRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeAnswerResponse {
    pub feedback: String,
}

/// A graded answer as kept in the session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub question: String,
    pub answer: String,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

impl AnswerFeedback {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        feedback: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            feedback: feedback.into(),
            created_at: Utc::now(),
        }
    }
}

pub fn build_feedback_prompt(
    job_description: &str,
    resume: &str,
    question: &str,
    answer: &str,
) -> String {
    fill_template(
        ANSWER_ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("{persona}", COACH_PERSONA),
            ("{job_description}", job_description),
            ("{resume}", resume),
            ("{question}", question),
            ("{answer}", answer),
        ],
    )
}

/// Returns the provider's free-text evaluation, trimmed.
pub async fn analyze_answer(
    llm: &dyn LlmProvider,
    job_description: &str,
    resume: &str,
    question: &str,
    answer: &str,
) -> Result<String, LlmError> {
    let prompt = build_feedback_prompt(job_description, resume, question, answer);
    let feedback = llm.complete(&prompt).await?;
    info!("Answer feedback generated ({} chars)", feedback.len());
    Ok(feedback.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::questions::tests::StubProvider;

    #[test]
    fn test_feedback_prompt_contains_all_inputs() {
        let prompt = build_feedback_prompt(
            "Go backend role",
            "Python dev",
            "Why Go?",
            "Because goroutines.",
        );
        for needle in ["Go backend role", "Python dev", "Why Go?", "Because goroutines."] {
            assert!(prompt.contains(needle), "missing {needle}");
        }
        assert!(prompt.contains("out of 30 points"));
        assert!(prompt.starts_with(COACH_PERSONA));
    }

    #[test]
    fn test_answer_feedback_serializes_camel_case() {
        let entry = AnswerFeedback::new("Why Go?", "Goroutines.", "Score: 20/30");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["question"], "Why Go?");
        assert_eq!(json["feedback"], "Score: 20/30");
        assert!(json["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_answer_trims_completion() {
        let llm = StubProvider::replying("\n Score: 24/30\nVerdict: strong \n");
        let feedback = analyze_answer(&llm, "jd", "cv", "q", "a").await.unwrap();
        assert_eq!(feedback, "Score: 24/30\nVerdict: strong");
    }
}
