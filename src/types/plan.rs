//! Combined intervention plan: request, verdict and audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    BarrierEnvelope, SeverityCounts, VerificationOverrides, VerificationResult, Violation,
    WellboreSection,
};
use crate::error::{ensure_non_negative, ensure_positive, InputError};

/// Role of a barrier in the combined plan request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BarrierRole {
    Primary,
    Secondary,
}

/// Verification state of a barrier in the combined plan request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlanBarrierStatus {
    Verified,
    Unverified,
    Compromised,
}

/// Barrier as listed on an intervention plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanBarrier {
    pub name: String,
    /// ft MD
    pub depth: f64,
    #[serde(alias = "barrier_type")]
    pub role: BarrierRole,
    pub status: PlanBarrierStatus,
    #[serde(default)]
    pub verification_method: String,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool { true }

impl PlanBarrier {
    pub fn new(name: impl Into<String>, depth: f64, role: BarrierRole, status: PlanBarrierStatus) -> Self {
        Self {
            name: name.into(),
            depth,
            role,
            status,
            verification_method: String::new(),
            required: true,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.status == PlanBarrierStatus::Verified
    }
}

/// Combined plan call.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawPlanRequest")]
pub struct PlanRequest {
    pub well_id: Option<String>,
    pub intervention_type: String,
    /// Equipment ids, top of string first
    pub tool_string: Vec<String>,
    pub wellbore: Vec<WellboreSection>,
    pub barriers: Vec<PlanBarrier>,
    /// Overrides the configured weight ceiling, lbs
    pub max_weight: Option<f64>,
    /// Full envelope; when present the complete barrier verification also runs
    pub envelope: Option<BarrierEnvelope>,
    /// Layered over the configured verification options
    pub options: VerificationOverrides,
}

#[derive(Deserialize)]
struct RawPlanRequest {
    #[serde(default)]
    well_id: Option<String>,
    intervention_type: String,
    tool_string: Vec<String>,
    #[serde(default)]
    wellbore: Vec<WellboreSection>,
    #[serde(default)]
    barriers: Vec<PlanBarrier>,
    #[serde(default)]
    max_weight: Option<f64>,
    #[serde(default)]
    envelope: Option<BarrierEnvelope>,
    #[serde(default)]
    options: VerificationOverrides,
}

impl TryFrom<RawPlanRequest> for PlanRequest {
    type Error = InputError;

    fn try_from(raw: RawPlanRequest) -> Result<Self, Self::Error> {
        if let Some(w) = raw.max_weight {
            ensure_positive("plan request", "max_weight", w)?;
        }
        for barrier in &raw.barriers {
            ensure_non_negative(&format!("plan barrier '{}'", barrier.name), "depth", barrier.depth)?;
        }
        Ok(Self {
            well_id: raw.well_id,
            intervention_type: raw.intervention_type,
            tool_string: raw.tool_string,
            wellbore: raw.wellbore,
            barriers: raw.barriers,
            max_weight: raw.max_weight,
            envelope: raw.envelope,
            options: raw.options,
        })
    }
}

/// Overall plan verdict, ordered by severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Approved,
    Flagged,
    Rejected,
}

impl PlanStatus {
    /// Any CRITICAL -> rejected, any violation -> flagged, none -> approved.
    pub fn from_violations<'a>(violations: impl IntoIterator<Item = &'a Violation>) -> Self {
        let mut status = PlanStatus::Approved;
        for v in violations {
            if v.is_critical() {
                return PlanStatus::Rejected;
            }
            status = PlanStatus::Flagged;
        }
        status
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanStatus::Approved => write!(f, "APPROVED"),
            PlanStatus::Flagged => write!(f, "FLAGGED"),
            PlanStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// One procedural step.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlanStep {
    pub step: u32,
    pub action: String,
    pub why: String,
}

/// Counts recorded alongside every plan.
#[derive(Debug, Clone, Serialize)]
pub struct AuditTrail {
    pub evaluated_at: DateTime<Utc>,
    pub tool_string: Vec<String>,
    pub tool_count: usize,
    pub wellbore_sections: usize,
    pub barriers_checked: usize,
    pub total_violations: usize,
    pub critical_violations: usize,
    pub severity_counts: SeverityCounts,
}

/// Intervention plan with verdict and reasoning.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub well_id: Option<String>,
    pub intervention_type: String,
    pub status: PlanStatus,
    pub constraint_violations: Vec<Violation>,
    pub barrier_violations: Vec<Violation>,
    /// Present when the request carried a full envelope
    pub barrier_verification: Option<VerificationResult>,
    pub plan_steps: Vec<PlanStep>,
    pub assumptions: Vec<String>,
    pub audit_trail: AuditTrail,
    pub stop_job_required: bool,
    pub summary: String,
}

impl Plan {
    pub fn all_violations(&self) -> impl Iterator<Item = &Violation> {
        self.constraint_violations.iter().chain(self.barrier_violations.iter())
    }
}
