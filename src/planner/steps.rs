//! Procedural skeleton and assumption list for a plan.

use std::collections::HashSet;

use crate::types::{PlanStep, Violation};

/// Five-step procedure parameterized by intervention type.
pub fn generate_steps(intervention_type: &str) -> Vec<PlanStep> {
    [
        ("Verify well barriers", "NORSOK D-010 compliance".to_string()),
        ("Rig up equipment", "Prepare for intervention".to_string()),
        ("Run tool string", "Deploy intervention equipment".to_string()),
        ("Execute operation", format!("Complete {intervention_type}")),
        ("Pull out of hole", "Recover equipment".to_string()),
    ]
    .into_iter()
    .zip(1..)
    .map(|((action, why), step)| PlanStep {
        step,
        action: action.to_string(),
        why,
    })
    .collect()
}

/// Unique, non-empty assumptions in first-seen order.
pub fn extract_assumptions<'a>(violations: impl IntoIterator<Item = &'a Violation>) -> Vec<String> {
    let mut seen = HashSet::new();
    violations
        .into_iter()
        .map(Violation::assumption)
        .filter(|a| !a.is_empty() && seen.insert(*a))
        .map(ToString::to_string)
        .collect()
}
