//! Plan builders for the cleaning pipeline.
//!
//! Two producers, one contract: the deterministic rule-based builder and
//! the LLM advisory path both emit a [`scour_model::CleaningPlan`] that has
//! passed validation and sanitization. The policy composition in
//! [`build_plan`] guarantees a usable plan even when the advisor fails.

pub mod client;
pub mod error;
pub mod extract;
pub mod llm;
pub mod policy;
pub mod prompt;
pub mod rule_based;
pub mod sanitize;
pub mod validate;

pub use client::{LlmClient, LlmConfig};
pub use error::AdvisorError;
pub use extract::extract_json;
pub use llm::build_llm_plan;
pub use policy::build_plan;
pub use prompt::build_prompt;
pub use rule_based::rule_based_plan;
pub use sanitize::sanitize;
pub use validate::validate;
