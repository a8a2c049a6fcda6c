//! Well barrier inputs: elements, envelopes and depth intervals.
//!
//! Barrier type and status are closed enumerations; an unknown tag fails
//! deserialization at the boundary. Depth ordering and numeric sanity are
//! checked on construction (`new`) and on deserialization.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{
    ensure_finite, ensure_identifier, ensure_non_negative, ensure_ordered, InputError,
};

// ============================================================================
// Barrier Type / Status
// ============================================================================

/// Barrier element types per NORSOK D-010.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BarrierType {
    Casing,
    Tubing,
    Packer,
    Cement,
    Wellhead,
    ChristmasTree,
    Valve,
    Plug,
    FluidColumn,
    Bop,
}

impl std::fmt::Display for BarrierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BarrierType::Casing => "casing",
            BarrierType::Tubing => "tubing",
            BarrierType::Packer => "packer",
            BarrierType::Cement => "cement",
            BarrierType::Wellhead => "wellhead",
            BarrierType::ChristmasTree => "christmas tree",
            BarrierType::Valve => "valve",
            BarrierType::Plug => "plug",
            BarrierType::FluidColumn => "fluid column",
            BarrierType::Bop => "BOP",
        };
        write!(f, "{name}")
    }
}

/// Barrier integrity status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum BarrierStatus {
    #[default]
    Intact,
    Degraded,
    Failed,
    Untested,
    Unknown,
}

impl BarrierStatus {
    /// Intact and degraded barriers still isolate; everything else does not count.
    pub fn is_functional(self) -> bool {
        matches!(self, BarrierStatus::Intact | BarrierStatus::Degraded)
    }
}

impl std::fmt::Display for BarrierStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BarrierStatus::Intact => write!(f, "INTACT"),
            BarrierStatus::Degraded => write!(f, "DEGRADED"),
            BarrierStatus::Failed => write!(f, "FAILED"),
            BarrierStatus::Untested => write!(f, "UNTESTED"),
            BarrierStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ============================================================================
// Depth Interval
// ============================================================================

/// Closed measured-depth interval in feet, `start <= end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawInterval")]
pub struct DepthInterval {
    pub start: f64,
    pub end: f64,
}

#[derive(Deserialize)]
struct RawInterval {
    start: f64,
    end: f64,
}

impl TryFrom<RawInterval> for DepthInterval {
    type Error = InputError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DepthInterval {
    /// Validated constructor: both ends finite and `start <= end`.
    pub fn new(start: f64, end: f64) -> Result<Self, InputError> {
        ensure_ordered("depth interval", start, end)?;
        Ok(Self { start, end })
    }

    /// Interval covering both depths in whichever order they are given.
    pub fn spanning(a: f64, b: f64) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Zero-length interval: no coverage fraction can be computed over it.
    pub fn is_degenerate(&self) -> bool {
        self.length() <= 0.0
    }
}

impl std::fmt::Display for DepthInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{} ft", self.start, self.end)
    }
}

// ============================================================================
// Barrier Element
// ============================================================================

/// A single barrier element in the well construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawBarrierElement")]
pub struct BarrierElement {
    pub barrier_id: String,
    pub barrier_type: BarrierType,
    /// Top depth, ft MD
    pub depth_top: f64,
    /// Bottom depth, ft MD
    pub depth_bottom: f64,
    pub status: BarrierStatus,
    /// Pressure rating, psi
    pub pressure_rating: Option<f64>,
    pub last_test_date: Option<DateTime<Utc>>,
    /// Last test pressure, psi
    pub last_test_pressure: Option<f64>,
    pub test_passed: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
struct RawBarrierElement {
    barrier_id: String,
    barrier_type: BarrierType,
    depth_top: f64,
    depth_bottom: f64,
    #[serde(default)]
    status: BarrierStatus,
    #[serde(default)]
    pressure_rating: Option<f64>,
    #[serde(default)]
    last_test_date: Option<DateTime<Utc>>,
    #[serde(default)]
    last_test_pressure: Option<f64>,
    #[serde(default)]
    test_passed: Option<bool>,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<RawBarrierElement> for BarrierElement {
    type Error = InputError;

    fn try_from(raw: RawBarrierElement) -> Result<Self, Self::Error> {
        let element = Self {
            barrier_id: raw.barrier_id,
            barrier_type: raw.barrier_type,
            depth_top: raw.depth_top,
            depth_bottom: raw.depth_bottom,
            status: raw.status,
            pressure_rating: raw.pressure_rating,
            last_test_date: raw.last_test_date,
            last_test_pressure: raw.last_test_pressure,
            test_passed: raw.test_passed,
            notes: raw.notes,
        };
        element.validate()?;
        Ok(element)
    }
}

impl BarrierElement {
    /// Create an element with no ratings or test record.
    pub fn new(
        barrier_id: impl Into<String>,
        barrier_type: BarrierType,
        depth_top: f64,
        depth_bottom: f64,
        status: BarrierStatus,
    ) -> Result<Self, InputError> {
        let element = Self {
            barrier_id: barrier_id.into(),
            barrier_type,
            depth_top,
            depth_bottom,
            status,
            pressure_rating: None,
            last_test_date: None,
            last_test_pressure: None,
            test_passed: None,
            notes: None,
        };
        element.validate()?;
        Ok(element)
    }

    pub fn with_pressure_rating(mut self, psi: f64) -> Self {
        self.pressure_rating = Some(psi);
        self
    }

    /// Record the last pressure test.
    pub fn with_last_test(mut self, date: DateTime<Utc>, pressure_psi: f64, passed: bool) -> Self {
        self.last_test_date = Some(date);
        self.last_test_pressure = Some(pressure_psi);
        self.test_passed = Some(passed);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Depth span of the element as an interval.
    pub fn span(&self) -> DepthInterval {
        DepthInterval::spanning(self.depth_top, self.depth_bottom)
    }

    /// Check identifier, depth ordering and numeric fields.
    pub fn validate(&self) -> Result<(), InputError> {
        let context = format!("barrier '{}'", self.barrier_id);
        ensure_identifier("barrier", &self.barrier_id)?;
        ensure_ordered(&context, self.depth_top, self.depth_bottom)?;
        if let Some(rating) = self.pressure_rating {
            ensure_non_negative(&context, "pressure_rating", rating)?;
        }
        if let Some(p) = self.last_test_pressure {
            ensure_non_negative(&context, "last_test_pressure", p)?;
        }
        Ok(())
    }
}

// ============================================================================
// Barrier Envelope
// ============================================================================

/// Complete barrier envelope for a well or operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawBarrierEnvelope")]
pub struct BarrierEnvelope {
    pub well_id: String,
    /// e.g. "P&A", "Completion", "Intervention"
    pub operation_name: String,
    pub primary_barriers: Vec<BarrierElement>,
    pub secondary_barriers: Vec<BarrierElement>,
    pub depth_interval_start: f64,
    pub depth_interval_end: f64,
    /// Expected reservoir pressure, psi
    pub reservoir_pressure: Option<f64>,
    pub h2s_present: bool,
    pub metadata: HashMap<String, String>,
}

#[derive(Deserialize)]
struct RawBarrierEnvelope {
    well_id: String,
    operation_name: String,
    #[serde(default)]
    primary_barriers: Vec<BarrierElement>,
    #[serde(default)]
    secondary_barriers: Vec<BarrierElement>,
    depth_interval_start: f64,
    depth_interval_end: f64,
    #[serde(default)]
    reservoir_pressure: Option<f64>,
    #[serde(default)]
    h2s_present: bool,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

impl TryFrom<RawBarrierEnvelope> for BarrierEnvelope {
    type Error = InputError;

    fn try_from(raw: RawBarrierEnvelope) -> Result<Self, Self::Error> {
        let envelope = Self {
            well_id: raw.well_id,
            operation_name: raw.operation_name,
            primary_barriers: raw.primary_barriers,
            secondary_barriers: raw.secondary_barriers,
            depth_interval_start: raw.depth_interval_start,
            depth_interval_end: raw.depth_interval_end,
            reservoir_pressure: raw.reservoir_pressure,
            h2s_present: raw.h2s_present,
            metadata: raw.metadata,
        };
        envelope.validate()?;
        Ok(envelope)
    }
}

impl BarrierEnvelope {
    /// Start an envelope with empty barrier lists.
    pub fn new(
        well_id: impl Into<String>,
        operation_name: impl Into<String>,
        interval: DepthInterval,
    ) -> Self {
        Self {
            well_id: well_id.into(),
            operation_name: operation_name.into(),
            primary_barriers: Vec::new(),
            secondary_barriers: Vec::new(),
            depth_interval_start: interval.start,
            depth_interval_end: interval.end,
            reservoir_pressure: None,
            h2s_present: false,
            metadata: HashMap::new(),
        }
    }

    pub fn with_primary(mut self, element: BarrierElement) -> Self {
        self.primary_barriers.push(element);
        self
    }

    pub fn with_secondary(mut self, element: BarrierElement) -> Self {
        self.secondary_barriers.push(element);
        self
    }

    pub fn with_reservoir_pressure(mut self, psi: f64) -> Self {
        self.reservoir_pressure = Some(psi);
        self
    }

    pub fn with_h2s(mut self, present: bool) -> Self {
        self.h2s_present = present;
        self
    }

    pub fn interval(&self) -> DepthInterval {
        DepthInterval::spanning(self.depth_interval_start, self.depth_interval_end)
    }

    /// Primary followed by secondary elements.
    pub fn all_barriers(&self) -> impl Iterator<Item = &BarrierElement> {
        self.primary_barriers.iter().chain(self.secondary_barriers.iter())
    }

    pub fn barrier_count(&self) -> usize {
        self.primary_barriers.len() + self.secondary_barriers.len()
    }

    /// Check the interval, the reservoir pressure and every element.
    pub fn validate(&self) -> Result<(), InputError> {
        let context = format!("envelope '{}'", self.well_id);
        ensure_identifier("envelope", &self.well_id)?;
        ensure_ordered(&context, self.depth_interval_start, self.depth_interval_end)?;
        if let Some(p) = self.reservoir_pressure {
            ensure_finite(&context, "reservoir_pressure", p)?;
            ensure_non_negative(&context, "reservoir_pressure", p)?;
        }
        for element in self.all_barriers() {
            element.validate()?;
        }
        Ok(())
    }
}
