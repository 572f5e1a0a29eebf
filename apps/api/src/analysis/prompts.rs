// LLM prompt constants for resume analysis.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume-vs-JD evaluation — enforces JSON-only output.
pub const ANALYSIS_SYSTEM: &str =
    "You are an expert career coach and ATS (Applicant Tracking System) optimizer. \
    You evaluate how well a candidate's resume fits a specific job description. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Analysis prompt template. `{resume_text}` and `{job_description}` are filled
/// by `build_analysis_prompt`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Compare the resume below against the job description the way an ATS and an experienced recruiter would.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 78,
  "summary": "One or two sentences on overall fit.",
  "strengths": ["Five years of production Rust matches the core requirement"],
  "weaknesses": ["No evidence of Kubernetes operations"],
  "suggestions": ["Quantify the latency improvements in the payments project"],
  "missingKeywords": ["Kubernetes", "gRPC"],
  "matchingSkills": ["Rust", "PostgreSQL"],
  "skillGaps": ["Kubernetes"],
  "overallAssessment": "A short paragraph a candidate can act on.",
  "experienceMatch": "How the candidate's seniority and years compare to the role."
}

Rules:
- "score" is an integer from 0 to 100. 90+ means nearly every hard requirement is evidenced; below 40 means most are missing.
- "missingKeywords" are terms an ATS would scan for that appear in the job description but not in the resume.
- "matchingSkills" must appear in BOTH documents. "skillGaps" are required skills the resume does not show.
- Keep every list item to one sentence or one keyword. Order lists from most to least important.
- Use empty lists rather than omitting fields.

{grounding}

RESUME TEXT:
"""
{resume_text}
"""

JOB DESCRIPTION:
"""
{job_description}
"""

Return ONLY the JSON object."#;
