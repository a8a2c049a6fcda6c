//! Well barrier verification (NORSOK D-010)
//!
//! Implements the dual-barrier principle: every well operation needs two
//! independent, functional, tested barrier envelopes covering the interval of
//! interest.
//!
//! ## Check order
//!
//! 1. Empty envelope short-circuit (stop job, nothing else runs)
//! 2. Zero-length interval
//! 3. Dual barrier requirement
//! 4. Element integrity (status, test currency)
//! 5. Pressure ratings (needs reservoir pressure)
//! 6. Depth coverage
//! 7. H2S cautions and shared-element warnings
//!
//! The envelope is validated before any check runs, so values set through
//! the builders or public fields are held to the same rules as parsed input.
//!
//! Verification is pure: given the same envelope, options and clock reading
//! it always produces the same result.

pub mod coverage;
pub mod dual;
pub mod integrity;
mod summary;

pub use coverage::{depth_coverage, merge_ranges};
pub use summary::executive_summary;

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::InputError;
use crate::types::{BarrierEnvelope, VerificationOptions, VerificationResult, Violation};

/// Barrier envelope verifier.
///
/// Holds only the clock used for test-currency checks, so one instance can
/// be shared freely across threads.
#[derive(Clone)]
pub struct BarrierVerifier {
    clock: Arc<dyn Clock>,
}

impl Default for BarrierVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BarrierVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarrierVerifier").finish_non_exhaustive()
    }
}

impl BarrierVerifier {
    /// Verifier reading the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Run every check against one envelope.
    pub fn verify(
        &self,
        envelope: &BarrierEnvelope,
        options: &VerificationOptions,
    ) -> Result<VerificationResult, InputError> {
        envelope.validate()?;

        let now = self.clock.now();
        let interval = envelope.interval();

        let mut result = VerificationResult {
            well_id: envelope.well_id.clone(),
            operation_name: envelope.operation_name.clone(),
            evaluated_at: now,
            strict_mode: options.strict_mode,
            dual_barrier_satisfied: false,
            violations: Vec::new(),
            warnings: Vec::new(),
            skipped_checks: Vec::new(),
            primary_barrier_count: envelope.primary_barriers.len(),
            secondary_barrier_count: envelope.secondary_barriers.len(),
            depth_intervals_analyzed: vec![interval],
            executive_summary: String::new(),
            stop_job_required: false,
        };

        if envelope.barrier_count() == 0 {
            result.violations.push(dual::no_barriers_defined(envelope));
            return Ok(Self::finish(envelope, result));
        }

        if let Some(v) = dual::check_interval(envelope) {
            result.violations.push(v);
        }

        result
            .violations
            .extend(dual::check_dual_barrier_requirement(envelope));

        result.violations.extend(integrity::validate_integrity(
            envelope.all_barriers(),
            options,
            now,
        ));

        if options.check_pressure_ratings {
            match envelope.reservoir_pressure {
                Some(pressure) => result
                    .violations
                    .extend(dual::check_pressure_ratings(envelope.all_barriers(), pressure)),
                None => {
                    debug!(well = %envelope.well_id, "No reservoir pressure, rating check skipped");
                    result
                        .skipped_checks
                        .push("pressure_ratings: no reservoir pressure supplied".to_string());
                }
            }
        }

        if !options.check_test_dates {
            result
                .skipped_checks
                .push("test_dates: disabled by options".to_string());
        }

        result.violations.extend(dual::check_depth_coverage(envelope));

        if envelope.h2s_present {
            result.warnings.extend(dual::check_h2s_requirements(envelope));
        }
        result.warnings.extend(dual::shared_element_warnings(envelope));

        Ok(Self::finish(envelope, result))
    }

    /// Verify many envelopes in parallel; output order matches input order.
    ///
    /// Fails if any envelope is invalid.
    pub fn verify_many(
        &self,
        envelopes: &[BarrierEnvelope],
        options: &VerificationOptions,
    ) -> Result<Vec<VerificationResult>, InputError> {
        envelopes
            .par_iter()
            .map(|envelope| self.verify(envelope, options))
            .collect()
    }

    fn finish(envelope: &BarrierEnvelope, mut result: VerificationResult) -> VerificationResult {
        result.dual_barrier_satisfied = !result.violations.iter().any(Violation::is_critical);
        result.stop_job_required = result.violations.iter().any(Violation::is_stop_job);
        result.executive_summary =
            executive_summary(envelope, &result.violations, result.stop_job_required);

        info!(
            well = %result.well_id,
            operation = %result.operation_name,
            violations = result.violations.len(),
            critical = result.critical_count(),
            dual_barrier = result.dual_barrier_satisfied,
            stop_job = result.stop_job_required,
            "Barrier verification complete"
        );

        result
    }
}
