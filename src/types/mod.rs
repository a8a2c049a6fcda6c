//! Shared data structures for barrier and toolstring verification
//!
//! - Inputs: BarrierElement / BarrierEnvelope, Equipment / WellboreSection
//! - Findings: Violation (built through ViolationBuilder), Severity
//! - Outputs: VerificationResult, ToolstringReport, Plan

mod barrier;
mod equipment;
mod violation;
mod result;
mod plan;

pub use barrier::*;
pub use equipment::*;
pub use violation::*;
pub use result::*;
pub use plan::*;
