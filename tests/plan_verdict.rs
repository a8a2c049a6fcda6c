//! Plan Verdict Tests
//!
//! Combined plan generation through the public API, plus property checks on
//! verdict folding and depth coverage.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use wellgate::barrier::depth_coverage;
use wellgate::{
    BarrierElement, BarrierStatus, BarrierType, ConstraintSolver, DepthInterval, Equipment,
    EquipmentCatalog, FixedClock, PlanGenerator, PlanRequest, PlanStatus, Severity, Violation,
    ViolationCategory,
};

fn generator() -> PlanGenerator {
    let catalog = EquipmentCatalog::from_equipment([
        Equipment::new("SL-001", "Rope Socket", "slickline", 1.5, 2.0, 5.0).unwrap(),
        Equipment::new("SL-010", "Stem Bar", "slickline", 1.875, 5.0, 45.0).unwrap(),
        Equipment::new("GR-380", "Gauge Ring 3.8in", "slickline", 3.8, 0.5, 6.0).unwrap(),
    ])
    .unwrap();
    PlanGenerator::with_clock(
        ConstraintSolver::new(Arc::new(catalog)),
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap())),
    )
}

fn parse(json: &str) -> PlanRequest {
    serde_json::from_str(json).unwrap()
}

const WELLBORE: &str = r#"[
    {"name": "Production Casing", "top_depth": 0, "bottom_depth": 6000, "casing_id": 6.184},
    {"name": "Tubing", "top_depth": 6000, "bottom_depth": 10500, "casing_id": 3.958}
]"#;

const VERIFIED_BARRIERS: &str = r#"[
    {"name": "Surface BOP", "depth": 0, "role": "primary", "status": "verified"},
    {"name": "DHSV", "depth": 2500, "role": "secondary", "status": "verified"}
]"#;

// ============================================================================
// Verdicts
// ============================================================================

#[test]
fn clean_slickline_plan_is_approved() {
    let plan = generator().generate_plan(&parse(&format!(
        r#"{{"well_id": "W-7", "intervention_type": "slickline",
            "tool_string": ["SL-001", "SL-010"],
            "wellbore": {WELLBORE}, "barriers": {VERIFIED_BARRIERS}}}"#
    )))
    .unwrap();

    assert_eq!(plan.status, PlanStatus::Approved);
    assert!(!plan.stop_job_required);
    assert_eq!(plan.audit_trail.tool_count, 2);
    assert_eq!(plan.audit_trail.wellbore_sections, 2);
    assert_eq!(plan.audit_trail.total_violations, 0);
    assert_eq!(plan.summary, "APPROVED: 0 violation(s) (0 critical) for slickline with 2 tool(s)");
    assert_eq!(
        plan.audit_trail.evaluated_at,
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    );
}

#[test]
fn tight_clearance_is_flagged() {
    let plan = generator().generate_plan(&parse(&format!(
        r#"{{"intervention_type": "slickline", "tool_string": ["SL-001", "GR-380"],
            "wellbore": {WELLBORE}, "barriers": {VERIFIED_BARRIERS}}}"#
    )))
    .unwrap();

    assert_eq!(plan.status, PlanStatus::Flagged);
    assert!(!plan.stop_job_required);
    assert_eq!(plan.constraint_violations.len(), 1);
    assert_eq!(plan.constraint_violations[0].severity(), Severity::High);
    assert!(!plan.assumptions.is_empty());
}

#[test]
fn unverified_barrier_rejects() {
    let plan = generator().generate_plan(&parse(&format!(
        r#"{{"intervention_type": "slickline", "tool_string": ["SL-001"],
            "wellbore": {WELLBORE},
            "barriers": [
                {{"name": "Surface BOP", "depth": 0, "role": "primary", "status": "verified"}},
                {{"name": "DHSV", "depth": 2500, "role": "secondary", "status": "unverified"}}
            ]}}"#
    )))
    .unwrap();

    assert_eq!(plan.status, PlanStatus::Rejected);
    assert!(plan.stop_job_required);
    let categories: Vec<ViolationCategory> =
        plan.barrier_violations.iter().map(|v| v.category()).collect();
    assert_eq!(
        categories,
        [
            ViolationCategory::InsufficientVerifiedBarriers,
            ViolationCategory::IncompleteBarrierEnvelope,
        ]
    );
}

#[test]
fn embedded_envelope_feeds_verdict() {
    let plan = generator().generate_plan(&parse(&format!(
        r#"{{"well_id": "W-9", "intervention_type": "wireline", "tool_string": ["SL-001"],
            "wellbore": {WELLBORE},
            "envelope": {{
                "well_id": "W-9",
                "operation_name": "Wireline Logging",
                "primary_barriers": [{{
                    "barrier_id": "PKR-1", "barrier_type": "packer",
                    "depth_top": 9000, "depth_bottom": 9010, "status": "failed"
                }}],
                "secondary_barriers": [{{
                    "barrier_id": "DHSV", "barrier_type": "valve",
                    "depth_top": 0, "depth_bottom": 9500, "status": "intact"
                }}],
                "depth_interval_start": 8000,
                "depth_interval_end": 10000
            }}}}"#
    )))
    .unwrap();

    let verification = plan.barrier_verification.as_ref().unwrap();
    assert!(verification.stop_job_required);
    assert_eq!(plan.status, PlanStatus::Rejected);
    assert_eq!(plan.barrier_violations.len(), verification.violations.len());
    assert!(plan
        .barrier_violations
        .iter()
        .any(|v| v.category() == ViolationCategory::BarrierFailed));
    assert_eq!(plan.audit_trail.barriers_checked, 2);
}

#[test]
fn plan_serializes_lowercase_status() {
    let plan = generator().generate_plan(&parse(&format!(
        r#"{{"intervention_type": "slickline", "tool_string": ["SL-001"],
            "wellbore": {WELLBORE}, "barriers": {VERIFIED_BARRIERS}}}"#
    )))
    .unwrap();
    let value = serde_json::to_value(&plan).unwrap();
    assert_eq!(value["status"], "approved");
    assert_eq!(value["plan_steps"].as_array().map(Vec::len), Some(5));
}

// ============================================================================
// Properties
// ============================================================================

fn arb_violation() -> impl Strategy<Value = Violation> {
    (0u8..6).prop_map(|kind| match kind {
        0 => Violation::finding(Severity::Info, ViolationCategory::TestExpired).build(),
        1 => Violation::finding(Severity::Low, ViolationCategory::TestExpired).build(),
        2 => Violation::finding(Severity::Medium, ViolationCategory::TestExpired).build(),
        3 => Violation::finding(Severity::High, ViolationCategory::ClearanceInsufficient).build(),
        4 => Violation::finding(Severity::Critical, ViolationCategory::BarrierStatusUnknown).build(),
        _ => Violation::stop_job(ViolationCategory::OdIdClash).build(),
    })
}

fn arb_status() -> impl Strategy<Value = BarrierStatus> {
    prop_oneof![
        Just(BarrierStatus::Intact),
        Just(BarrierStatus::Degraded),
        Just(BarrierStatus::Failed),
        Just(BarrierStatus::Untested),
        Just(BarrierStatus::Unknown),
    ]
}

fn arb_element() -> impl Strategy<Value = BarrierElement> {
    (0.0f64..20_000.0, 0.0f64..5_000.0, arb_status()).prop_map(|(top, len, status)| {
        BarrierElement::new("B", BarrierType::Cement, top, top + len, status).unwrap()
    })
}

proptest! {
    #[test]
    fn adding_a_violation_never_improves_verdict(
        list in proptest::collection::vec(arb_violation(), 0..12),
        extra in arb_violation(),
    ) {
        let before = PlanStatus::from_violations(&list);
        let mut grown = list.clone();
        grown.push(extra);
        let after = PlanStatus::from_violations(&grown);
        prop_assert!(after >= before);
        prop_assert!(after != PlanStatus::Approved);
    }

    #[test]
    fn any_critical_rejects(list in proptest::collection::vec(arb_violation(), 0..12)) {
        let mut with_critical = list;
        with_critical.push(Violation::stop_job(ViolationCategory::BarrierFailed).build());
        prop_assert_eq!(PlanStatus::from_violations(&with_critical), PlanStatus::Rejected);
    }

    #[test]
    fn coverage_stays_in_unit_range(
        elements in proptest::collection::vec(arb_element(), 0..10),
        start in 0.0f64..15_000.0,
        len in 0.0f64..5_000.0,
    ) {
        let interval = DepthInterval::new(start, start + len).unwrap();
        let coverage = depth_coverage(&elements, interval);
        prop_assert!((0.0..=1.0).contains(&coverage));
    }

    #[test]
    fn intact_element_spanning_interval_is_full_coverage(
        start in 0.0f64..15_000.0,
        len in 1.0f64..5_000.0,
        pad in 0.0f64..500.0,
    ) {
        let interval = DepthInterval::new(start, start + len).unwrap();
        let element = BarrierElement::new(
            "CMT", BarrierType::Cement, (start - pad).max(0.0), start + len + pad, BarrierStatus::Intact,
        ).unwrap();
        prop_assert_eq!(depth_coverage(&[element], interval), 1.0);
        prop_assert_eq!(depth_coverage(&[], interval), 0.0);
    }
}
