// All LLM prompt templates for the Interview module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Number of questions the provider is asked for.
pub const QUESTION_COUNT: usize = 20;

/// Question generation prompt template.
/// Replace: {persona}, {count}, {experience_note}, {format_instruction},
///          {job_description}, {resume}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"{persona} Your task is to generate a list of {count} interview questions based on the provided job description and candidate resume.

**Instructions:**
1.  **Analyze the Job Description and Resume:** Carefully compare the skills and experiences listed in the resume against the requirements in the job description.
2.  **Identify Key Areas:** Determine the most critical skills, technologies, and responsibilities for the role. Note where the candidate's experience is strong (matches) and where there are potential gaps (requirements the resume does not show).
3.  **Generate High-Quality Questions:** Create exactly {count} questions that directly probe the candidate's fitness for the job, balanced between the two groups below.
    *   **For Skills Listed on the Resume:** Ask specific, experience-based questions. Instead of "Do you know X?", ask "Describe a project where you used X to solve Y."
    *   **For Required Skills Missing from the Resume:** Ask questions that probe the gap: how the candidate would approach the skill, related experience they could transfer, or how quickly they could ramp up.
4.  **Calibrate Difficulty:** {experience_note}

**Output Format:**
{format_instruction}

**Job Description:**
{job_description}

**Candidate Resume:**
{resume}"#;

/// Difficulty note when nothing is known about the candidate's seniority.
pub const EXPERIENCE_UNKNOWN: &str =
    "Infer the candidate's seniority from the resume and pitch the questions accordingly.";

/// Answer evaluation prompt template.
/// Replace: {persona}, {job_description}, {resume}, {question}, {answer}
pub const ANSWER_ANALYSIS_PROMPT_TEMPLATE: &str = r#"{persona}
Evaluate the following candidate answer based on the job description and resume.

---
Job Description:
{job_description}

Resume Summary:
{resume}

Interview Question:
{question}

Transcript of Candidate's Answer:
{answer}
---

Do the following:
1. Score the candidate's answer out of 30 points:
   - Relevance to question and job description (10 pts)
   - Clarity and structure (10 pts)
   - Communication style & confidence (10 pts)
2. Give 3 bullet points of feedback:
   - What was done well
   - What was missing or unclear
   - What could be improved
3. Suggest 1 key improvement area.
4. Final verdict: strong / average / weak."#;

/// Fills `{slot}` placeholders in a single left-to-right pass.
///
/// Inserted values are never rescanned, so uploaded text that happens to
/// contain `{resume}` or similar is copied through untouched. Unknown
/// `{...}` sequences are left as they are.
pub fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let extra: usize = slots.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match slots.iter().find(|(name, _)| tail.starts_with(name)) {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_every_slot() {
        let out = fill_template(
            "{a} and {b}, then {a}",
            &[("{a}", "x"), ("{b}", "y")],
        );
        assert_eq!(out, "x and y, then x");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let out = fill_template("{a}|{b}", &[("{a}", "{b}"), ("{b}", "B")]);
        assert_eq!(out, "{b}|B");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let out = fill_template("json {\"k\": 1} {a}", &[("{a}", "v")]);
        assert_eq!(out, "json {\"k\": 1} v");
    }

    #[test]
    fn test_templates_have_no_unfilled_slots() {
        let prompt = fill_template(
            ANSWER_ANALYSIS_PROMPT_TEMPLATE,
            &[
                ("{persona}", "P"),
                ("{job_description}", "J"),
                ("{resume}", "R"),
                ("{question}", "Q"),
                ("{answer}", "A"),
            ],
        );
        assert!(!prompt.contains('{'));
    }
}
