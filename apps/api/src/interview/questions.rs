//! Interview question generation: prompt construction, provider call, and
//! best-effort parsing of the completion into single-line questions.
//!
//! Flow: build_prompt → LlmProvider::complete → parse_questions → remove_duplicates.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::interview::prompts::{
    fill_template, EXPERIENCE_UNKNOWN, QUESTION_COUNT, QUESTION_PROMPT_TEMPLATE,
};
use crate::interview::sampling::remove_duplicates;
use crate::llm_client::prompts::{INTERVIEWER_PERSONA, NUMBERED_LIST_INSTRUCTION};
use crate::llm_client::{strip_code_fences, LlmError, LlmProvider};

/// `1. q`, `1) q`, `12: q`, `Q3. q`, `Question 4: q`
static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:q(?:uestion)?\s*)?\d{1,3}\s*[.):]\s*(.+)$").unwrap()
});

/// `- q`, `* q`, `• q`
static BULLET_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-*•]\s+(.+)$").unwrap());

/// What the upload form says about the candidate's seniority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateExperience {
    Fresher,
    Experienced { years: Option<String> },
}

impl CandidateExperience {
    /// Interprets the optional `experience` / `yearsOfExperience` form fields.
    /// Unrecognised values are treated as absent.
    pub fn from_form(experience: Option<&str>, years: Option<&str>) -> Option<Self> {
        match experience?.trim().to_ascii_lowercase().as_str() {
            "fresher" => Some(CandidateExperience::Fresher),
            "experienced" => Some(CandidateExperience::Experienced {
                years: years.map(str::trim).filter(|y| !y.is_empty()).map(String::from),
            }),
            _ => None,
        }
    }

    fn prompt_note(&self) -> String {
        match self {
            CandidateExperience::Fresher => {
                "The candidate is a fresher; favour fundamentals and learning ability over depth of past work."
                    .to_string()
            }
            CandidateExperience::Experienced { years: Some(years) } => format!(
                "The candidate is experienced with {years} years of experience; pitch the questions at that level."
            ),
            CandidateExperience::Experienced { years: None } => {
                "The candidate is experienced; pitch the questions at a professional level.".to_string()
            }
        }
    }
}

/// Output of one generation call, deduplicated, in provider order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub questions: Vec<String>,
}

/// Renders the question prompt. Deterministic: identical inputs give an
/// identical prompt. Both texts are embedded verbatim and never truncated.
pub fn build_prompt(job_description: &str, resume: &str) -> String {
    build_prompt_for(job_description, resume, None)
}

/// `build_prompt` with an optional seniority hint from the upload form.
pub fn build_prompt_for(
    job_description: &str,
    resume: &str,
    experience: Option<&CandidateExperience>,
) -> String {
    let experience_note = experience
        .map(CandidateExperience::prompt_note)
        .unwrap_or_else(|| EXPERIENCE_UNKNOWN.to_string());

    fill_template(
        QUESTION_PROMPT_TEMPLATE,
        &[
            ("{persona}", INTERVIEWER_PERSONA),
            ("{count}", &QUESTION_COUNT.to_string()),
            ("{experience_note}", &experience_note),
            ("{format_instruction}", NUMBERED_LIST_INSTRUCTION),
            ("{job_description}", job_description),
            ("{resume}", resume),
        ],
    )
}

/// Splits a raw completion into questions.
///
/// Markdown headings (`# ...`, or a line bold from end to end with no `?`)
/// are dropped first. Numbered and bulleted lines are then collected
/// separately and the larger group wins, numbered on a tie, so numbered
/// sections holding bulleted questions yield the questions. With neither,
/// any line containing a `?` is taken. Lines ending in `:` with no `?` are
/// skipped and markdown emphasis is removed. Never yields an empty or
/// multi-line entry.
pub fn parse_questions(completion: &str) -> Vec<String> {
    let body = strip_code_fences(completion);
    let lines: Vec<String> = body
        .lines()
        .filter(|line| !is_markdown_heading(line))
        .map(strip_emphasis)
        .collect();

    let numbered = capture_all(&lines, &NUMBERED_LINE);
    let bulleted = capture_all(&lines, &BULLET_LINE);
    if !numbered.is_empty() && numbered.len() >= bulleted.len() {
        return numbered;
    }
    if !bulleted.is_empty() {
        return bulleted;
    }

    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| l.contains('?'))
        .map(String::from)
        .collect()
}

/// Runs the full pipeline against the configured provider.
///
/// A non-empty completion from which nothing can be parsed is an error,
/// never an empty list.
pub async fn generate_questions(
    llm: &dyn LlmProvider,
    prompt: &str,
) -> Result<GenerationResult, LlmError> {
    info!(
        "Requesting questions from {} (model: {}), prompt {} chars",
        llm.name(),
        llm.model(),
        prompt.len()
    );

    let completion = llm.complete(prompt).await?;
    let parsed = parse_questions(&completion);

    if parsed.is_empty() {
        warn!(
            "Could not parse any questions from completion: {:?}",
            completion.chars().take(200).collect::<String>()
        );
        return Err(LlmError::NoQuestions {
            chars: completion.len(),
        });
    }

    let parsed_count = parsed.len();
    let questions = remove_duplicates(parsed);
    info!(
        "Parsed {} questions ({} after deduplication)",
        parsed_count,
        questions.len()
    );

    Ok(GenerationResult { questions })
}

fn strip_emphasis(line: &str) -> String {
    line.replace("**", "").replace("__", "")
}

fn capture_all(lines: &[String], pattern: &Regex) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| pattern.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|q| !q.is_empty() && !is_heading(q))
        .collect()
}

fn is_markdown_heading(line: &str) -> bool {
    let line = line.trim();
    if line.starts_with('#') {
        return true;
    }
    let bold = ["**", "__"].iter().any(|&mark| {
        line.len() > 2 * mark.len() && line.starts_with(mark) && line.ends_with(mark)
    });
    bold && !line.contains('?')
}

fn is_heading(text: &str) -> bool {
    text.ends_with(':') && !text.contains('?')
}
