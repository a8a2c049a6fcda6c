//! Executive summary text for a verification result.

use crate::types::{BarrierEnvelope, SeverityCounts, Violation};

/// One-paragraph verdict in plain language.
///
/// Stop-job wins over everything; otherwise a clean run reads as passed and
/// anything else as warnings.
pub fn executive_summary(
    envelope: &BarrierEnvelope,
    violations: &[Violation],
    stop_job: bool,
) -> String {
    let counts = SeverityCounts::tally(violations);
    let subject = format!(
        "Operation: {}\nDepth interval: {}",
        envelope.operation_name,
        envelope.interval()
    );

    if stop_job {
        return format!(
            "BARRIER VERIFICATION FAILED - STOP JOB\n\n\
             {subject}\n\
             Critical violations: {}\n\
             High-severity violations: {}\n\n\
             Dual barrier envelope is COMPROMISED. Do NOT proceed until violations are resolved.",
            counts.critical, counts.high
        );
    }

    if violations.is_empty() {
        return format!(
            "BARRIER VERIFICATION PASSED\n\n\
             {subject}\n\
             Primary barriers: {}\n\
             Secondary barriers: {}\n\n\
             Dual barrier envelope is intact per NORSOK D-010. Proceed with operation.",
            envelope.primary_barriers.len(),
            envelope.secondary_barriers.len()
        );
    }

    format!(
        "BARRIER VERIFICATION: WARNINGS DETECTED\n\n\
         {subject}\n\
         High-severity violations: {}\n\
         Other findings: {}\n\n\
         Barriers are present but require attention. Review violations before proceeding.",
        counts.high,
        counts.total() - counts.high - counts.critical
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DepthInterval, Severity, ViolationCategory};

    fn envelope() -> BarrierEnvelope {
        BarrierEnvelope::new("W-1", "Wireline Run", DepthInterval::new(0.0, 10_000.0).unwrap())
    }

    #[test]
    fn test_passed() {
        let s = executive_summary(&envelope(), &[], false);
        assert!(s.starts_with("BARRIER VERIFICATION PASSED"));
        assert!(s.contains("Wireline Run"));
        assert!(s.contains("0-10000 ft"));
    }

    #[test]
    fn test_stop_job_takes_precedence() {
        let v = [Violation::stop_job(ViolationCategory::BarrierFailed).build()];
        let s = executive_summary(&envelope(), &v, true);
        assert!(s.contains("STOP JOB"));
        assert!(s.contains("Critical violations: 1"));
        assert!(s.contains("Operation: Wireline Run"));
        assert!(s.contains("Depth interval: 0-10000 ft"));
    }

    #[test]
    fn test_warnings() {
        let v = [Violation::finding(Severity::High, ViolationCategory::BarrierDegraded).build()];
        let s = executive_summary(&envelope(), &v, false);
        assert!(s.starts_with("BARRIER VERIFICATION: WARNINGS DETECTED"));
        assert!(s.contains("High-severity violations: 1"));
        assert!(s.contains("Operation: Wireline Run"));
        assert!(s.contains("Depth interval: 0-10000 ft"));
    }
}
