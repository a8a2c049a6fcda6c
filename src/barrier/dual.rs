//! Dual-barrier requirement (NORSOK D-010 Section 5.3).
//!
//! Primary AND secondary barriers must exist, be functional, and sit inside
//! the interval of interest. Partial coverage is tolerated; only zero overlap
//! is a violation.

use std::collections::HashSet;

use super::coverage::depth_coverage;
use crate::types::{BarrierElement, BarrierEnvelope, BarrierType, Violation, ViolationCategory};

/// Short-circuit finding when neither list has any element.
pub fn no_barriers_defined(envelope: &BarrierEnvelope) -> Violation {
    Violation::stop_job(ViolationCategory::NoBarriersDefined)
        .description("No barriers defined for this operation")
        .depth(envelope.interval())
        .standard("NORSOK D-010 Section 5.1")
        .assumption("Every well operation requires a defined barrier envelope")
        .rule("Primary and secondary barrier lists are both empty")
        .recommendation("Define primary and secondary barriers before proceeding")
        .build()
}

/// At least one functional primary and one functional secondary barrier.
pub fn check_dual_barrier_requirement(envelope: &BarrierEnvelope) -> Vec<Violation> {
    let mut violations = Vec::new();
    let interval = envelope.interval();

    let has_primary = envelope.primary_barriers.iter().any(|b| b.status.is_functional());
    let has_secondary = envelope.secondary_barriers.iter().any(|b| b.status.is_functional());

    if !has_primary {
        violations.push(
            Violation::stop_job(ViolationCategory::NoPrimaryBarrier)
                .description("No functional primary barrier detected")
                .depth(interval)
                .standard("NORSOK D-010 Section 5.3.1")
                .assumption("Only intact or degraded barriers are functional")
                .rule("Count of functional primary barriers = 0")
                .recommendation(
                    "Establish primary barrier (e.g., packer + fluid column, or plug) before proceeding",
                )
                .build(),
        );
    }

    if !has_secondary {
        violations.push(
            Violation::stop_job(ViolationCategory::NoSecondaryBarrier)
                .description("No functional secondary barrier detected - dual barrier envelope compromised")
                .depth(interval)
                .standard("NORSOK D-010 Section 5.3.1")
                .assumption("Only intact or degraded barriers are functional")
                .rule("Count of functional secondary barriers = 0")
                .recommendation(
                    "Establish secondary barrier (e.g., wellhead valve, BOP, or second plug) before proceeding",
                )
                .build(),
        );
    }

    violations
}

/// Zero-overlap check for each barrier role.
pub fn check_depth_coverage(envelope: &BarrierEnvelope) -> Vec<Violation> {
    let interval = envelope.interval();
    let mut violations = Vec::new();

    for (role, barriers, category) in [
        ("primary", &envelope.primary_barriers, ViolationCategory::NoPrimaryCoverage),
        ("secondary", &envelope.secondary_barriers, ViolationCategory::NoSecondaryCoverage),
    ] {
        let coverage = depth_coverage(barriers, interval);
        if coverage == 0.0 {
            violations.push(
                Violation::stop_job(category)
                    .description(format!(
                        "{} barriers do not overlap with depth interval {}-{} ft",
                        capitalize(role),
                        interval.start,
                        interval.end
                    ))
                    .depth(interval)
                    .standard("NORSOK D-010 Section 5.3.2")
                    .assumption("A barrier must sit within the interval of interest to isolate it")
                    .rule(format!("Functional {role} coverage of interval = 0.0"))
                    .recommendation(format!(
                        "Ensure {role} barriers are positioned within the depth interval of interest"
                    ))
                    .build(),
            );
        }
    }

    violations
}

/// Ratings below reservoir pressure. Elements without a rating are skipped.
pub fn check_pressure_ratings<'a>(
    barriers: impl IntoIterator<Item = &'a BarrierElement>,
    reservoir_pressure: f64,
) -> Vec<Violation> {
    barriers
        .into_iter()
        .filter_map(|b| {
            let rating = b.pressure_rating?;
            if rating >= reservoir_pressure {
                return None;
            }
            Some(
                Violation::stop_job(ViolationCategory::InsufficientPressureRating)
                    .title(format!("Insufficient pressure rating: {}", b.barrier_id))
                    .description(format!(
                        "Barrier rated for {rating} PSI but reservoir pressure is {reservoir_pressure} PSI"
                    ))
                    .element(&b.barrier_id)
                    .depth(b.span())
                    .standard("API RP 96 Section 4.2")
                    .assumption("Barrier rating must meet or exceed the expected reservoir pressure")
                    .rule("pressure_rating < reservoir_pressure")
                    .recommendation("Replace with higher-rated barrier or reduce reservoir pressure")
                    .build(),
            )
        })
        .collect()
}

/// Zero-length interval with barriers present: coverage cannot be assessed.
pub fn check_interval(envelope: &BarrierEnvelope) -> Option<Violation> {
    let interval = envelope.interval();
    if !interval.is_degenerate() {
        return None;
    }
    Some(
        Violation::stop_job(ViolationCategory::DegenerateInterval)
            .description(format!(
                "Depth interval {}-{} ft has zero length; barrier coverage cannot be assessed",
                interval.start, interval.end
            ))
            .depth(interval)
            .standard("NORSOK D-010 Section 5.3.2")
            .assumption("Barrier verification needs an interval of non-zero length")
            .rule("depth_interval_end - depth_interval_start <= 0")
            .recommendation("Define the depth interval of interest before verifying barriers")
            .build(),
    )
}

/// H2S cautions (NORSOK D-010 Annex E). Informational only.
pub fn check_h2s_requirements(envelope: &BarrierEnvelope) -> Vec<String> {
    let mut warnings: Vec<String> = envelope
        .all_barriers()
        .filter(|b| b.barrier_type == BarrierType::Valve)
        .map(|b| {
            format!(
                "WARNING: Valve barrier '{}' in H2S environment. \
                 Verify valve is H2S-rated and has been function-tested per NORSOK D-010 Annex E.",
                b.barrier_id
            )
        })
        .collect();

    warnings.push(
        "H2S environment detected. Ensure all personnel have H2S training and monitoring equipment is active."
            .to_string(),
    );
    warnings
}

/// Elements listed as both primary and secondary.
pub fn shared_element_warnings(envelope: &BarrierEnvelope) -> Vec<String> {
    let primary: HashSet<&str> = envelope
        .primary_barriers
        .iter()
        .map(|b| b.barrier_id.as_str())
        .collect();

    let mut seen = HashSet::new();
    envelope
        .secondary_barriers
        .iter()
        .map(|b| b.barrier_id.as_str())
        .filter(|id| primary.contains(id) && seen.insert(*id))
        .map(|id| {
            format!(
                "Barrier '{id}' is listed as both primary and secondary; \
                 the two envelopes must be independent"
            )
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BarrierStatus, DepthInterval, Severity};

    fn envelope() -> BarrierEnvelope {
        BarrierEnvelope::new("W-1", "Intervention", DepthInterval::new(0.0, 10_000.0).unwrap())
    }

    fn el(id: &str, t: BarrierType, top: f64, bottom: f64, s: BarrierStatus) -> BarrierElement {
        BarrierElement::new(id, t, top, bottom, s).unwrap()
    }

    #[test]
    fn test_degraded_counts_as_functional() {
        let env = envelope()
            .with_primary(el("P-1", BarrierType::Packer, 8000.0, 8010.0, BarrierStatus::Degraded))
            .with_secondary(el("S-1", BarrierType::Valve, 0.0, 10.0, BarrierStatus::Intact));
        assert!(check_dual_barrier_requirement(&env).is_empty());
    }

    #[test]
    fn test_missing_secondary() {
        let env = envelope().with_primary(el("P-1", BarrierType::Plug, 9000.0, 9100.0, BarrierStatus::Intact));
        let v = check_dual_barrier_requirement(&env);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category(), ViolationCategory::NoSecondaryBarrier);
        assert_eq!(v[0].title(), "No Secondary Barrier");
        assert!(v[0].is_stop_job());
    }

    #[test]
    fn test_failed_primary_does_not_count() {
        let env = envelope()
            .with_primary(el("P-1", BarrierType::Cement, 9000.0, 9100.0, BarrierStatus::Failed))
            .with_secondary(el("S-1", BarrierType::Bop, 0.0, 20.0, BarrierStatus::Intact));
        let v = check_dual_barrier_requirement(&env);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category(), ViolationCategory::NoPrimaryBarrier);
    }

    #[test]
    fn test_partial_coverage_tolerated() {
        let env = envelope()
            .with_primary(el("P-1", BarrierType::Plug, 9000.0, 9100.0, BarrierStatus::Intact))
            .with_secondary(el("S-1", BarrierType::Valve, 0.0, 10.0, BarrierStatus::Intact));
        assert!(check_depth_coverage(&env).is_empty());
    }

    #[test]
    fn test_zero_coverage_flagged_per_role() {
        let env = BarrierEnvelope::new("W-1", "P&A", DepthInterval::new(5000.0, 6000.0).unwrap())
            .with_primary(el("P-1", BarrierType::Plug, 9000.0, 9100.0, BarrierStatus::Intact))
            .with_secondary(el("S-1", BarrierType::Plug, 5500.0, 5600.0, BarrierStatus::Intact));
        let v = check_depth_coverage(&env);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category(), ViolationCategory::NoPrimaryCoverage);
        assert!(v[0].description().starts_with("Primary barriers do not overlap"));
    }

    #[test]
    fn test_pressure_rating_below_reservoir() {
        let b = el("P-1", BarrierType::Packer, 8000.0, 8010.0, BarrierStatus::Intact).with_pressure_rating(10_000.0);
        let v = check_pressure_ratings([&b], 12_500.0);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].severity(), Severity::Critical);
        assert!(v[0].title().to_lowercase().contains("insufficient pressure rating"));
    }

    #[test]
    fn test_pressure_rating_equal_passes_and_unrated_skipped() {
        let rated = el("P-1", BarrierType::Packer, 8000.0, 8010.0, BarrierStatus::Intact).with_pressure_rating(5000.0);
        let unrated = el("P-2", BarrierType::FluidColumn, 0.0, 8000.0, BarrierStatus::Intact);
        assert!(check_pressure_ratings([&rated, &unrated], 5000.0).is_empty());
    }

    #[test]
    fn test_h2s_warnings_per_valve_plus_general() {
        let env = envelope()
            .with_primary(el("P-1", BarrierType::Packer, 8000.0, 8010.0, BarrierStatus::Intact))
            .with_secondary(el("DHSV", BarrierType::Valve, 1500.0, 1505.0, BarrierStatus::Intact))
            .with_secondary(el("MV", BarrierType::Valve, 0.0, 5.0, BarrierStatus::Intact));
        let w = check_h2s_requirements(&env);
        assert_eq!(w.len(), 3);
        assert!(w[0].contains("DHSV"));
        assert!(w[2].contains("H2S training"));
    }

    #[test]
    fn test_degenerate_interval() {
        let env = BarrierEnvelope::new("W-1", "P&A", DepthInterval::new(5000.0, 5000.0).unwrap());
        assert!(check_interval(&env).is_some());
        assert!(check_interval(&envelope()).is_none());
    }

    #[test]
    fn test_shared_element_warning() {
        let shared = el("X-1", BarrierType::Plug, 100.0, 200.0, BarrierStatus::Intact);
        let env = envelope().with_primary(shared.clone()).with_secondary(shared);
        let w = shared_element_warnings(&env);
        assert_eq!(w.len(), 1);
        assert!(w[0].contains("X-1"));
    }
}
