//! Violation record shared by the barrier and toolstring checkers.
//!
//! Every finding carries its provenance: the rule that fired, the assumption
//! behind it, a confidence and a recommended remediation. Violations can only
//! be created through [`ViolationBuilder`], which makes an inconsistent
//! stop-job record (stop-job on a non-critical finding) unrepresentable:
//! [`Violation::stop_job`] is the only path that sets the flag and it pins the
//! severity to `Critical`.

use serde::{Deserialize, Serialize};

use super::DepthInterval;

/// Risk severity classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only
    Info = 0,
    /// Monitor and document
    Low = 1,
    /// Plan remediation
    Medium = 2,
    /// Immediate remediation required
    High = 3,
    /// Stop, do not proceed
    Critical = 4,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// What kind of rule produced a violation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    // Barrier envelope
    NoBarriersDefined,
    NoPrimaryBarrier,
    NoSecondaryBarrier,
    NoPrimaryCoverage,
    NoSecondaryCoverage,
    DegenerateInterval,
    // Barrier element integrity
    BarrierFailed,
    BarrierDegraded,
    BarrierUntested,
    BarrierStatusUnknown,
    TestExpired,
    InsufficientPressureRating,
    // Combined-plan barrier list
    InsufficientVerifiedBarriers,
    IncompleteBarrierEnvelope,
    // Toolstring
    UnknownEquipment,
    WeightLimitExceeded,
    ClearanceInsufficient,
    OdIdClash,
}

impl ViolationCategory {
    /// Stable upper-case code, used as the violation id prefix.
    pub fn code(self) -> &'static str {
        match self {
            ViolationCategory::NoBarriersDefined => "NO_BARRIERS_DEFINED",
            ViolationCategory::NoPrimaryBarrier => "NO_PRIMARY_BARRIER",
            ViolationCategory::NoSecondaryBarrier => "NO_SECONDARY_BARRIER",
            ViolationCategory::NoPrimaryCoverage => "NO_PRIMARY_COVERAGE",
            ViolationCategory::NoSecondaryCoverage => "NO_SECONDARY_COVERAGE",
            ViolationCategory::DegenerateInterval => "DEGENERATE_INTERVAL",
            ViolationCategory::BarrierFailed => "BARRIER_FAILED",
            ViolationCategory::BarrierDegraded => "BARRIER_DEGRADED",
            ViolationCategory::BarrierUntested => "BARRIER_UNTESTED",
            ViolationCategory::BarrierStatusUnknown => "BARRIER_STATUS_UNKNOWN",
            ViolationCategory::TestExpired => "TEST_EXPIRED",
            ViolationCategory::InsufficientPressureRating => "INSUFFICIENT_PRESSURE_RATING",
            ViolationCategory::InsufficientVerifiedBarriers => "INSUFFICIENT_VERIFIED_BARRIERS",
            ViolationCategory::IncompleteBarrierEnvelope => "INCOMPLETE_BARRIER_ENVELOPE",
            ViolationCategory::UnknownEquipment => "UNKNOWN_EQUIPMENT",
            ViolationCategory::WeightLimitExceeded => "WEIGHT_LIMIT_EXCEEDED",
            ViolationCategory::ClearanceInsufficient => "CLEARANCE_INSUFFICIENT",
            ViolationCategory::OdIdClash => "OD_ID_CLASH",
        }
    }

    /// Title-cased form of the code: `NO_PRIMARY_BARRIER` -> `No Primary Barrier`.
    pub fn title(self) -> String {
        self.code()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A detected violation with full audit provenance.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Violation {
    id: String,
    severity: Severity,
    category: ViolationCategory,
    title: String,
    description: String,
    affected_depth: Option<DepthInterval>,
    elements: Vec<String>,
    standard_reference: Option<String>,
    assumption: String,
    rule: String,
    confidence: f64,
    recommendation: String,
    stop_job: bool,
}

impl Violation {
    /// Critical finding that halts operations.
    pub fn stop_job(category: ViolationCategory) -> ViolationBuilder {
        ViolationBuilder::new(Severity::Critical, category, true)
    }

    /// Finding that does not by itself halt operations.
    pub fn finding(severity: Severity, category: ViolationCategory) -> ViolationBuilder {
        ViolationBuilder::new(severity, category, false)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn category(&self) -> ViolationCategory {
        self.category
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn affected_depth(&self) -> Option<DepthInterval> {
        self.affected_depth
    }

    /// Identifiers of the barriers or tools implicated.
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn standard_reference(&self) -> Option<&str> {
        self.standard_reference.as_deref()
    }

    pub fn assumption(&self) -> &str {
        &self.assumption
    }

    /// Label of the rule that fired.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    pub fn is_stop_job(&self) -> bool {
        self.stop_job
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// Builder for [`Violation`]; see the module docs for the stop-job guarantee.
#[derive(Debug, Clone)]
#[must_use]
pub struct ViolationBuilder {
    id: Option<String>,
    severity: Severity,
    category: ViolationCategory,
    title: Option<String>,
    description: String,
    affected_depth: Option<DepthInterval>,
    elements: Vec<String>,
    standard_reference: Option<String>,
    assumption: String,
    rule: String,
    confidence: f64,
    recommendation: String,
    stop_job: bool,
}

impl ViolationBuilder {
    fn new(severity: Severity, category: ViolationCategory, stop_job: bool) -> Self {
        Self {
            id: None,
            severity,
            category,
            title: None,
            description: String::new(),
            affected_depth: None,
            elements: Vec::new(),
            standard_reference: None,
            assumption: String::new(),
            rule: String::new(),
            confidence: 1.0,
            recommendation: String::new(),
            stop_job,
        }
    }

    /// Explicit id. Defaults to `<CODE>` or `<CODE>:<elements joined by '+'>`.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Defaults to the title-cased category code.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn depth(mut self, interval: DepthInterval) -> Self {
        self.affected_depth = Some(interval);
        self
    }

    pub fn element(mut self, id: impl Into<String>) -> Self {
        self.elements.push(id.into());
        self
    }

    pub fn standard(mut self, reference: impl Into<String>) -> Self {
        self.standard_reference = Some(reference.into());
        self
    }

    pub fn assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumption = assumption.into();
        self
    }

    pub fn rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = rule.into();
        self
    }

    /// Clamped to `[0.0, 1.0]`; NaN becomes 0.0.
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        self
    }

    pub fn recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }

    pub fn build(self) -> Violation {
        let id = self.id.unwrap_or_else(|| {
            if self.elements.is_empty() {
                self.category.code().to_string()
            } else {
                format!("{}:{}", self.category.code(), self.elements.join("+"))
            }
        });
        Violation {
            id,
            severity: self.severity,
            category: self.category,
            title: self.title.unwrap_or_else(|| self.category.title()),
            description: self.description,
            affected_depth: self.affected_depth,
            elements: self.elements,
            standard_reference: self.standard_reference,
            assumption: self.assumption,
            rule: self.rule,
            confidence: self.confidence,
            recommendation: self.recommendation,
            stop_job: self.stop_job,
        }
    }
}

/// Per-severity tally of a violation list.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn tally<'a>(violations: impl IntoIterator<Item = &'a Violation>) -> Self {
        let mut counts = Self::default();
        for v in violations {
            match v.severity() {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_job_builder_forces_critical() {
        let v = Violation::stop_job(ViolationCategory::BarrierFailed)
            .element("P-1")
            .build();
        assert!(v.is_stop_job());
        assert_eq!(v.severity(), Severity::Critical);
    }

    #[test]
    fn test_finding_never_stops_job() {
        for severity in [Severity::Info, Severity::Low, Severity::Medium, Severity::High, Severity::Critical] {
            let v = Violation::finding(severity, ViolationCategory::TestExpired).build();
            assert!(!v.is_stop_job());
            assert_eq!(v.severity(), severity);
        }
    }

    #[test]
    fn test_default_id_and_title() {
        let v = Violation::stop_job(ViolationCategory::NoPrimaryBarrier).build();
        assert_eq!(v.id(), "NO_PRIMARY_BARRIER");
        assert_eq!(v.title(), "No Primary Barrier");

        let v = Violation::finding(Severity::High, ViolationCategory::OdIdClash)
            .element("PK-1")
            .element("GR-2")
            .build();
        assert_eq!(v.id(), "OD_ID_CLASH:PK-1+GR-2");
    }

    #[test]
    fn test_confidence_clamped() {
        let high = Violation::finding(Severity::Low, ViolationCategory::TestExpired)
            .confidence(1.7)
            .build();
        assert_eq!(high.confidence(), 1.0);
        let nan = Violation::finding(Severity::Low, ViolationCategory::TestExpired)
            .confidence(f64::NAN)
            .build();
        assert_eq!(nan.confidence(), 0.0);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Low > Severity::Info);
    }

    #[test]
    fn test_severity_counts() {
        let list = vec![
            Violation::stop_job(ViolationCategory::BarrierFailed).build(),
            Violation::finding(Severity::High, ViolationCategory::BarrierDegraded).build(),
            Violation::finding(Severity::High, ViolationCategory::WeightLimitExceeded).build(),
        ];
        let counts = SeverityCounts::tally(&list);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_serializes_snake_case_tags() {
        let v = Violation::finding(Severity::Medium, ViolationCategory::TestExpired).build();
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["severity"], "medium");
        assert_eq!(json["category"], "test_expired");
        assert_eq!(json["stop_job"], false);
    }
}
