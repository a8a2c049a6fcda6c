//! Per-element integrity: status and test currency.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::types::{
    BarrierElement, BarrierStatus, Severity, VerificationOptions, Violation, ViolationCategory,
};

/// Validate status and test currency of every element.
///
/// Rules can co-fire on one element: a failed barrier with an expired test
/// yields both findings.
pub fn validate_integrity<'a>(
    barriers: impl IntoIterator<Item = &'a BarrierElement>,
    options: &VerificationOptions,
    now: DateTime<Utc>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for barrier in barriers {
        if let Some(v) = status_violation(barrier, options.strict_mode) {
            debug!(barrier = %barrier.barrier_id, status = %barrier.status, "Barrier status finding");
            violations.push(v);
        }

        if options.check_test_dates {
            if let Some(v) = test_currency_violation(barrier, options.max_test_age_days, now) {
                debug!(barrier = %barrier.barrier_id, "Barrier test expired");
                violations.push(v);
            }
        }
    }

    violations
}

fn status_violation(barrier: &BarrierElement, strict_mode: bool) -> Option<Violation> {
    let id = &barrier.barrier_id;
    let v = match barrier.status {
        BarrierStatus::Intact => return None,
        BarrierStatus::Failed => Violation::stop_job(ViolationCategory::BarrierFailed)
            .title(format!("Failed barrier: {id}"))
            .description(format!(
                "Barrier {id} ({}) has failed integrity test",
                barrier.barrier_type
            ))
            .standard("NORSOK D-010 Section 5.4")
            .assumption("A failed barrier element provides no isolation")
            .rule("Barrier status = failed")
            .recommendation("Replace or repair barrier before proceeding. Do not rely on this barrier."),
        BarrierStatus::Degraded => Violation::finding(Severity::High, ViolationCategory::BarrierDegraded)
            .title(format!("Degraded barrier: {id}"))
            .description(format!("Barrier {id} ({}) shows degradation", barrier.barrier_type))
            .standard("NORSOK D-010 Section 5.4")
            .assumption("A degraded barrier still isolates but may not hold under full load")
            .rule("Barrier status = degraded")
            .recommendation("Re-test barrier or establish independent redundant barrier"),
        BarrierStatus::Untested => Violation::stop_job(ViolationCategory::BarrierUntested)
            .title(format!("Untested barrier: {id}"))
            .description(format!("Barrier {id} ({}) has no test record", barrier.barrier_type))
            .standard("NORSOK D-010 Section 6.3")
            .assumption("A barrier element must be verified by test before it is relied on")
            .rule("Barrier status = untested")
            .recommendation("Pressure test barrier before relying on it for well control"),
        BarrierStatus::Unknown if strict_mode => {
            Violation::finding(Severity::High, ViolationCategory::BarrierStatusUnknown)
                .title(format!("Unknown barrier status: {id}"))
                .description(format!(
                    "Barrier {id} ({}) has no recorded integrity status and is not counted as functional",
                    barrier.barrier_type
                ))
                .standard("NORSOK D-010 Section 5.4")
                .assumption("An element of unknown status cannot be credited as a barrier")
                .rule("Barrier status = unknown (strict mode)")
                .confidence(0.9)
                .recommendation("Establish barrier status by inspection or test before relying on it")
        }
        BarrierStatus::Unknown => return None,
    };

    Some(v.element(id).depth(barrier.span()).build())
}

fn test_currency_violation(
    barrier: &BarrierElement,
    max_test_age_days: u32,
    now: DateTime<Utc>,
) -> Option<Violation> {
    let last_test = barrier.last_test_date?;
    let age_days = (now - last_test).num_days();
    if age_days <= i64::from(max_test_age_days) {
        return None;
    }

    let id = &barrier.barrier_id;
    Some(
        Violation::finding(Severity::Medium, ViolationCategory::TestExpired)
            .title(format!("Barrier test expired: {id}"))
            .description(format!(
                "Barrier {id} last tested {age_days} days ago (max: {max_test_age_days})"
            ))
            .element(id)
            .depth(barrier.span())
            .standard("NORSOK D-010 Section 6.3")
            .assumption(format!(
                "Barrier tests older than {max_test_age_days} days no longer demonstrate integrity"
            ))
            .rule("Test age > max_test_age_days")
            .recommendation("Re-test barrier or accept risk with documented justification")
            .build(),
    )
}
