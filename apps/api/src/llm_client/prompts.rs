// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it and reuses these.

/// Instruction that keeps evaluations grounded in the supplied documents.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Base every statement on the resume text and job description provided. \
    Do NOT invent employers, titles, dates, certifications, or skills. \
    If the resume does not show a skill, treat it as missing.";
