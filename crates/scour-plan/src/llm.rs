//! The advisory plan path: prompt, complete, extract, validate, sanitize.

use scour_model::{CleaningPlan, PlanSource, TableProfile};
use tracing::debug;

use crate::client::LlmClient;
use crate::error::AdvisorError;
use crate::extract::extract_json;
use crate::prompt::build_prompt;
use crate::sanitize::sanitize;
use crate::validate::validate;

/// Build a plan through the advisor. Any failure is returned to the policy
/// layer, which falls back to the rule-based plan.
pub fn build_llm_plan(
    profile: &TableProfile,
    client: &dyn LlmClient,
) -> Result<CleaningPlan, AdvisorError> {
    let prompt = build_prompt(profile);
    let response = client.complete(&prompt)?;
    if response.trim().is_empty() {
        return Err(AdvisorError::EmptyResponse);
    }
    let value = extract_json(&response)?;
    let mut plan = validate(&value).map_err(|e| AdvisorError::Schema(e.to_string()))?;
    plan.source = PlanSource::Llm;
    debug!(notes = plan.notes.len(), "validated advisor plan");
    Ok(sanitize(plan))
}
