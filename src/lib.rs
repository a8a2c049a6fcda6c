//! WellGate: Well Barrier & Toolstring Verification Engine
//!
//! Deterministic safety gate for well-intervention planning. Every check is a
//! pure function of its inputs (plus a clock reading) and every finding is a
//! [`Violation`] carrying the rule, assumption, confidence and remediation
//! behind it.
//!
//! ## Architecture
//!
//! - **Barrier Verifier**: NORSOK D-010 dual-barrier checks over an envelope
//! - **Coverage Calculator**: merged depth coverage of functional barriers
//! - **Constraint Solver**: tool string vs. catalog and wellbore geometry
//! - **Plan Generator**: combines both into an approved / flagged / rejected plan
//! - **Catalog**: read-only equipment lookup with atomic reload

pub mod barrier;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod planner;
pub mod toolstring;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, EngineConfig};

// Re-export commonly used types
pub use types::{
    BarrierElement, BarrierEnvelope, BarrierStatus, BarrierType, BarrierVerificationRequest,
    DepthInterval, Equipment, Plan, PlanBarrier, PlanRequest, PlanStatus, Severity,
    ToolstringReport, ToolstringRequest, VerificationOptions, VerificationOverrides,
    VerificationResult, Violation, ViolationCategory, WellboreSection,
};

// Re-export engine components
pub use barrier::BarrierVerifier;
pub use catalog::{CatalogHandle, EquipmentCatalog};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CatalogError, InputError};
pub use planner::PlanGenerator;
pub use toolstring::ConstraintSolver;
