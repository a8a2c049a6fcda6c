//! Intervention plan synthesis
//!
//! Runs the toolstring solver and the barrier rules against one plan request,
//! then folds every finding into a single verdict:
//!
//! - any CRITICAL violation → REJECTED
//! - any other violation → FLAGGED
//! - nothing found → APPROVED
//!
//! Adding a violation can only move the verdict towards REJECTED. Malformed
//! input is an error, never a verdict.

pub mod barriers;
pub mod steps;

pub use barriers::{verify_plan_barriers, MIN_VERIFIED_BARRIERS};
pub use steps::{extract_assumptions, generate_steps};

use std::sync::Arc;

use tracing::info;

use crate::barrier::BarrierVerifier;
use crate::clock::{Clock, SystemClock};
use crate::error::{ensure_positive, InputError};
use crate::toolstring::{ConstraintSolver, DEFAULT_MAX_WEIGHT_LBS};
use crate::types::{
    AuditTrail, Plan, PlanRequest, PlanStatus, SeverityCounts, VerificationOptions, Violation,
};

/// Builds verdict-bearing plans from requests.
#[derive(Clone)]
pub struct PlanGenerator {
    solver: ConstraintSolver,
    verifier: BarrierVerifier,
    clock: Arc<dyn Clock>,
    default_max_weight: f64,
    default_options: VerificationOptions,
}

impl std::fmt::Debug for PlanGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanGenerator")
            .field("solver", &self.solver)
            .field("default_max_weight", &self.default_max_weight)
            .field("default_options", &self.default_options)
            .finish_non_exhaustive()
    }
}

impl PlanGenerator {
    pub fn new(solver: ConstraintSolver) -> Self {
        Self::with_clock(solver, Arc::new(SystemClock))
    }

    /// Generator whose timestamps and test-age checks read `clock`.
    pub fn with_clock(solver: ConstraintSolver, clock: Arc<dyn Clock>) -> Self {
        Self {
            solver,
            verifier: BarrierVerifier::with_clock(Arc::clone(&clock)),
            clock,
            default_max_weight: DEFAULT_MAX_WEIGHT_LBS,
            default_options: VerificationOptions::default(),
        }
    }

    /// Weight ceiling used when a request does not carry one.
    pub fn with_max_weight(mut self, max_weight_lbs: f64) -> Result<Self, InputError> {
        ensure_positive("plan generator", "max_weight", max_weight_lbs)?;
        self.default_max_weight = max_weight_lbs;
        Ok(self)
    }

    /// Options for envelope verification; request overrides are layered on top.
    #[must_use]
    pub fn with_options(mut self, options: VerificationOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn generate_plan(&self, request: &PlanRequest) -> Result<Plan, InputError> {
        let max_weight = request.max_weight.unwrap_or(self.default_max_weight);

        let constraint_violations =
            self.solver
                .check_toolstring_assembly(&request.tool_string, &request.wellbore, max_weight)?;

        // A full envelope supersedes an empty tagged list; a non-empty list is
        // always checked.
        let mut barrier_violations = if request.envelope.is_some() && request.barriers.is_empty() {
            Vec::new()
        } else {
            verify_plan_barriers(&request.barriers)
        };

        let options = request.options.apply_to(self.default_options);
        let barrier_verification = request
            .envelope
            .as_ref()
            .map(|envelope| self.verifier.verify(envelope, &options))
            .transpose()?;
        if let Some(result) = &barrier_verification {
            barrier_violations.extend(result.violations.iter().cloned());
        }

        let all: Vec<&Violation> = constraint_violations
            .iter()
            .chain(&barrier_violations)
            .collect();

        let status = PlanStatus::from_violations(all.iter().copied());
        let stop_job_required = all.iter().any(|v| v.is_stop_job());
        let severity_counts = SeverityCounts::tally(all.iter().copied());
        let assumptions = extract_assumptions(all.iter().copied());
        let barriers_checked = request.barriers.len()
            + request.envelope.as_ref().map_or(0, |e| e.barrier_count());

        let summary = format!(
            "{status}: {} violation(s) ({} critical) for {} with {} tool(s)",
            severity_counts.total(),
            severity_counts.critical,
            request.intervention_type,
            request.tool_string.len()
        );

        info!(
            well = request.well_id.as_deref().unwrap_or("-"),
            intervention = %request.intervention_type,
            status = %status,
            violations = severity_counts.total(),
            critical = severity_counts.critical,
            "Plan generated"
        );

        Ok(Plan {
            well_id: request.well_id.clone(),
            intervention_type: request.intervention_type.clone(),
            status,
            plan_steps: generate_steps(&request.intervention_type),
            assumptions,
            audit_trail: AuditTrail {
                evaluated_at: self.clock.now(),
                tool_string: request.tool_string.clone(),
                tool_count: request.tool_string.len(),
                wellbore_sections: request.wellbore.len(),
                barriers_checked,
                total_violations: severity_counts.total(),
                critical_violations: severity_counts.critical,
                severity_counts,
            },
            stop_job_required,
            summary,
            constraint_violations,
            barrier_violations,
            barrier_verification,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EquipmentCatalog;
    use crate::clock::FixedClock;
    use crate::types::{
        BarrierElement, BarrierEnvelope, BarrierRole, BarrierStatus, BarrierType, DepthInterval,
        Equipment, PlanBarrier, PlanBarrierStatus, VerificationOverrides, WellboreSection,
    };
    use chrono::{TimeZone, Utc};

    fn generator() -> PlanGenerator {
        let catalog = EquipmentCatalog::from_equipment([
            Equipment::new("SL-001", "Rope Socket", "slickline", 1.5, 2.0, 5.0).unwrap(),
            Equipment::new("SL-002", "Knuckle Joint", "slickline", 1.5, 1.5, 3.0).unwrap(),
        ])
        .unwrap();
        PlanGenerator::with_clock(
            ConstraintSolver::new(Arc::new(catalog)),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())),
        )
    }

    fn request(barriers: Vec<PlanBarrier>, tools: &[&str]) -> PlanRequest {
        PlanRequest {
            well_id: Some("W-1".to_string()),
            intervention_type: "slickline".to_string(),
            tool_string: tools.iter().map(ToString::to_string).collect(),
            wellbore: vec![WellboreSection::new("Production Casing", 0.0, 5000.0, 7.0).unwrap()],
            barriers,
            max_weight: None,
            envelope: None,
            options: VerificationOverrides::default(),
        }
    }

    fn verified_pair() -> Vec<PlanBarrier> {
        vec![
            PlanBarrier::new("Surface BOP", 0.0, BarrierRole::Primary, PlanBarrierStatus::Verified),
            PlanBarrier::new("DHSV", 2500.0, BarrierRole::Secondary, PlanBarrierStatus::Verified),
        ]
    }

    #[test]
    fn test_clean_request_is_approved() {
        let plan = generator().generate_plan(&request(verified_pair(), &["SL-001", "SL-002"])).unwrap();
        assert_eq!(plan.status, PlanStatus::Approved);
        assert!(!plan.stop_job_required);
        assert_eq!(plan.plan_steps.len(), 5);
        assert!(plan.assumptions.is_empty());
        assert_eq!(plan.audit_trail.barriers_checked, 2);
    }

    #[test]
    fn test_weight_override_flags() {
        let mut req = request(verified_pair(), &["SL-001", "SL-002"]);
        req.max_weight = Some(6.0);
        let plan = generator().generate_plan(&req).unwrap();
        assert_eq!(plan.status, PlanStatus::Flagged);
        assert_eq!(plan.constraint_violations.len(), 1);
    }

    #[test]
    fn test_unknown_tool_rejects() {
        let plan = generator().generate_plan(&request(verified_pair(), &["SL-001", "NOPE"])).unwrap();
        assert_eq!(plan.status, PlanStatus::Rejected);
        assert!(plan.stop_job_required);
        assert!(plan.summary.starts_with("REJECTED"));
    }

    #[test]
    fn test_missing_barriers_reject() {
        let plan = generator().generate_plan(&request(Vec::new(), &["SL-001"])).unwrap();
        assert_eq!(plan.status, PlanStatus::Rejected);
        assert_eq!(plan.barrier_violations.len(), 2);
        assert_eq!(plan.audit_trail.critical_violations, 2);
    }

    #[test]
    fn test_default_weight_must_be_positive() {
        assert!(generator().with_max_weight(f64::NAN).is_err());
        assert!(generator().with_max_weight(-1.0).is_err());

        let strict = generator().with_max_weight(6.0).unwrap();
        let plan = strict.generate_plan(&request(verified_pair(), &["SL-001", "SL-002"])).unwrap();
        assert_eq!(plan.status, PlanStatus::Flagged);
    }

    #[test]
    fn test_request_overrides_layer_on_configured_options() {
        let stale = BarrierElement::new("PKR", BarrierType::Packer, 0.0, 5000.0, BarrierStatus::Intact)
            .unwrap()
            .with_last_test(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(), 5000.0, true);
        let envelope = BarrierEnvelope::new("W-1", "Slickline", DepthInterval::new(0.0, 5000.0).unwrap())
            .with_primary(stale.clone())
            .with_secondary(BarrierElement { barrier_id: "DHSV".to_string(), ..stale });

        let mut req = request(verified_pair(), &["SL-001"]);
        req.envelope = Some(envelope);
        req.options.strict_mode = Some(true);

        let configured = VerificationOptions {
            check_test_dates: false,
            ..VerificationOptions::default()
        };
        let plan = generator().with_options(configured).generate_plan(&req).unwrap();
        let verification = plan.barrier_verification.unwrap();
        assert!(verification.strict_mode);
        assert!(verification
            .skipped_checks
            .iter()
            .any(|s| s.starts_with("test_dates")));
        assert!(plan
            .barrier_violations
            .iter()
            .all(|v| v.category() != crate::types::ViolationCategory::TestExpired));
    }

    #[test]
    fn test_invalid_section_is_an_error() {
        let mut req = request(verified_pair(), &["SL-001"]);
        req.wellbore[0].casing_id = -1.0;
        assert!(generator().generate_plan(&req).is_err());
    }
}
