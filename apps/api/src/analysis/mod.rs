// Resume analysis: resolve the resume source, extract PDF text, ask the model
// for a fit assessment and normalize it.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod error;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod requester;
pub mod service;
pub mod source;

#[cfg(test)]
pub mod test_support;
