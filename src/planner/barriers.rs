//! Barrier rules for the simplified barrier list carried on a plan request.

use crate::types::{BarrierRole, PlanBarrier, Violation, ViolationCategory};

/// Minimum verified barriers before an intervention may proceed.
pub const MIN_VERIFIED_BARRIERS: usize = 2;

/// Count and pairing rules over a tagged barrier list.
///
/// Both rules can fire together.
pub fn verify_plan_barriers(barriers: &[PlanBarrier]) -> Vec<Violation> {
    let mut violations = Vec::new();

    let verified: Vec<&PlanBarrier> = barriers.iter().filter(|b| b.is_verified()).collect();

    if verified.len() < MIN_VERIFIED_BARRIERS {
        violations.push(
            Violation::stop_job(ViolationCategory::InsufficientVerifiedBarriers)
                .description(format!(
                    "Insufficient verified barriers: {} (min {MIN_VERIFIED_BARRIERS} required)",
                    verified.len()
                ))
                .standard("NORSOK D-010 Section 5.2.1")
                .assumption("NORSOK D-010 requires minimum 2 independent barriers")
                .rule("NORSOK D-010 Section 5.2.1")
                .recommendation(
                    "Verify additional barriers or establish temporary barriers before intervention",
                )
                .build(),
        );
    }

    let has_role = |role: BarrierRole| verified.iter().any(|b| b.role == role);
    if !has_role(BarrierRole::Primary) || !has_role(BarrierRole::Secondary) {
        violations.push(
            Violation::stop_job(ViolationCategory::IncompleteBarrierEnvelope)
                .description("Missing primary or secondary barrier envelope")
                .standard("NORSOK D-010 Section 5.3.1")
                .assumption("Must have at least one primary AND one secondary barrier")
                .rule("NORSOK D-010 barrier philosophy")
                .recommendation("Establish barrier envelope before proceeding")
                .build(),
        );
    }

    violations
}
