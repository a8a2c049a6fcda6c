//! Verification options, requests and result records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BarrierEnvelope, DepthInterval, SeverityCounts, Violation, WellboreSection};
use crate::error::{ensure_positive, InputError};

// ============================================================================
// Options
// ============================================================================

/// Switches for a barrier verification call.
///
/// Also the `[verification]` section of the engine config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationOptions {
    /// Apply NORSOK rules strictly (unknown-status barriers become findings).
    #[serde(default = "default_strict_mode")]
    pub strict_mode: bool,

    /// Compare barrier ratings against reservoir pressure.
    #[serde(default = "default_check_pressure_ratings")]
    pub check_pressure_ratings: bool,

    /// Flag barriers whose last test is older than `max_test_age_days`.
    #[serde(default = "default_check_test_dates")]
    pub check_test_dates: bool,

    /// Maximum age of a barrier test, days.
    #[serde(default = "default_max_test_age_days")]
    pub max_test_age_days: u32,
}

fn default_strict_mode() -> bool { true }
fn default_check_pressure_ratings() -> bool { true }
fn default_check_test_dates() -> bool { true }
fn default_max_test_age_days() -> u32 { 365 }

impl Default for VerificationOptions {
    fn default() -> Self {
        Self {
            strict_mode: default_strict_mode(),
            check_pressure_ratings: default_check_pressure_ratings(),
            check_test_dates: default_check_test_dates(),
            max_test_age_days: default_max_test_age_days(),
        }
    }
}

// ============================================================================
// Barrier verification
// ============================================================================

/// Per-call option overrides. Fields left out fall back to the configured
/// options rather than the built-in defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_pressure_ratings: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_test_dates: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_test_age_days: Option<u32>,
}

impl VerificationOverrides {
    /// Layer these overrides on top of `base`.
    pub fn apply_to(self, base: VerificationOptions) -> VerificationOptions {
        VerificationOptions {
            strict_mode: self.strict_mode.unwrap_or(base.strict_mode),
            check_pressure_ratings: self
                .check_pressure_ratings
                .unwrap_or(base.check_pressure_ratings),
            check_test_dates: self.check_test_dates.unwrap_or(base.check_test_dates),
            max_test_age_days: self.max_test_age_days.unwrap_or(base.max_test_age_days),
        }
    }
}

/// Barrier verification call: an envelope plus option overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct BarrierVerificationRequest {
    pub barrier_envelope: BarrierEnvelope,
    #[serde(flatten)]
    pub overrides: VerificationOverrides,
}

impl BarrierVerificationRequest {
    /// Effective options for this call given the configured defaults.
    pub fn options(&self, defaults: &VerificationOptions) -> VerificationOptions {
        self.overrides.apply_to(*defaults)
    }
}

/// Complete barrier verification result with all findings.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationResult {
    pub well_id: String,
    pub operation_name: String,
    pub evaluated_at: DateTime<Utc>,
    pub strict_mode: bool,
    /// True when no CRITICAL finding was produced
    pub dual_barrier_satisfied: bool,
    pub violations: Vec<Violation>,
    /// Informational, non-blocking
    pub warnings: Vec<String>,
    /// Checks that could not run for lack of input data
    pub skipped_checks: Vec<String>,
    pub primary_barrier_count: usize,
    pub secondary_barrier_count: usize,
    pub depth_intervals_analyzed: Vec<DepthInterval>,
    pub executive_summary: String,
    /// True iff any violation carries stop-job
    pub stop_job_required: bool,
}

impl VerificationResult {
    pub fn severity_counts(&self) -> SeverityCounts {
        SeverityCounts::tally(&self.violations)
    }

    pub fn critical_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_critical()).count()
    }
}

// ============================================================================
// Toolstring validation
// ============================================================================

/// Toolstring validation call.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawToolstringRequest")]
pub struct ToolstringRequest {
    /// Equipment ids, top of string first
    pub tool_string: Vec<String>,
    pub wellbore: Vec<WellboreSection>,
    /// Overrides the configured weight ceiling, lbs
    pub max_weight: Option<f64>,
}

#[derive(Deserialize)]
struct RawToolstringRequest {
    tool_string: Vec<String>,
    #[serde(default)]
    wellbore: Vec<WellboreSection>,
    #[serde(default)]
    max_weight: Option<f64>,
}

impl TryFrom<RawToolstringRequest> for ToolstringRequest {
    type Error = InputError;

    fn try_from(raw: RawToolstringRequest) -> Result<Self, Self::Error> {
        if let Some(w) = raw.max_weight {
            ensure_positive("toolstring request", "max_weight", w)?;
        }
        Ok(Self {
            tool_string: raw.tool_string,
            wellbore: raw.wellbore,
            max_weight: raw.max_weight,
        })
    }
}

/// Outcome of a toolstring validation call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolstringReport {
    pub violations: Vec<Violation>,
    /// True when no CRITICAL violation was found
    pub valid: bool,
    pub critical_count: usize,
    pub stop_job_required: bool,
    /// Tools resolved from the catalog
    pub tool_count: usize,
    /// lbs, resolved tools only
    pub total_weight: f64,
    /// ft, resolved tools only
    pub total_length: f64,
    /// inches, `None` when no tool resolved
    pub max_od: Option<f64>,
}
