// Shared prompt fragments and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Persona line that opens every interview-related prompt.
pub const INTERVIEWER_PERSONA: &str = "You are an expert technical interviewer.";

/// Persona line for answer evaluation.
pub const COACH_PERSONA: &str = "You are an expert technical interviewer and career coach.";

/// Output rule appended to prompts whose response is split line by line.
pub const NUMBERED_LIST_INSTRUCTION: &str = "\
    Return ONLY a numbered list, one question per line, in the form `1. <question>`. \
    Do NOT include headings, section titles, explanations, or blank placeholder text. \
    Each question must fit on a single line.";
