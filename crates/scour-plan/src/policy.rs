//! Policy composition: which plan the pipeline actually runs.
//!
//! The advisory path is strictly optional. Whatever goes wrong there, the
//! caller receives a usable rule-based plan with a note recording the
//! failure; plan building never aborts a run.

use scour_model::{CleaningPlan, TableProfile};
use tracing::warn;

use crate::client::LlmClient;
use crate::llm::build_llm_plan;
use crate::rule_based::rule_based_plan;

/// Build the plan for a run.
///
/// With `use_llm` false the rule-based plan is returned unmodified. With it
/// true the advisor is consulted when a client is wired in; any advisor
/// failure falls back to the rule-based plan with an explanatory note.
pub fn build_plan(
    profile: &TableProfile,
    use_llm: bool,
    client: Option<&dyn LlmClient>,
) -> CleaningPlan {
    let rule_plan = rule_based_plan(profile);
    if !use_llm {
        return rule_plan;
    }
    let Some(client) = client else {
        let mut plan = rule_plan;
        plan.notes
            .push("llm plan requested but no client is configured; using rule-based plan".into());
        return plan;
    };
    match build_llm_plan(profile, client) {
        Ok(plan) => plan,
        Err(err) => {
            warn!(class = err.class(), error = %err, "advisor plan failed, falling back");
            let mut plan = rule_plan;
            plan.notes.push(format!(
                "llm plan failed ({}): {err}; fell back to rule-based plan",
                err.class()
            ));
            plan
        }
    }
}
