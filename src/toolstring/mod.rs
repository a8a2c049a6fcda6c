//! Toolstring constraint solver
//!
//! Validates an ordered tool string (top first) against the equipment catalog
//! and the wellbore geometry:
//!
//! - every id must resolve in the catalog
//! - total weight against the conveyance limit
//! - clearance of the largest OD against every wellbore section
//! - each tool must pass through the bore of the hollow tool above it
//!
//! Sections and the weight ceiling are validated before any rule runs; catalog
//! entries are validated when the catalog is built.

use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::EquipmentCatalog;
use crate::error::{ensure_positive, InputError};
use crate::types::{
    DepthInterval, Equipment, Severity, ToolstringReport, Violation, ViolationCategory, WellboreSection,
};

/// Minimum safe clearance between tool OD and casing ID, inches.
pub const MIN_CLEARANCE_IN: f64 = 0.25;

/// Default conveyance weight ceiling, lbs.
pub const DEFAULT_MAX_WEIGHT_LBS: f64 = 50_000.0;

/// Checks tool strings against a catalog snapshot.
#[derive(Debug, Clone)]
pub struct ConstraintSolver {
    catalog: Arc<EquipmentCatalog>,
}

impl ConstraintSolver {
    pub fn new(catalog: Arc<EquipmentCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &EquipmentCatalog {
        &self.catalog
    }

    /// All constraint violations for one assembly.
    ///
    /// Unknown ids are reported and then dropped from the string, so the
    /// bore check compares the resolved tools that end up adjacent.
    pub fn check_toolstring_assembly(
        &self,
        tool_string: &[String],
        wellbore: &[WellboreSection],
        max_weight: f64,
    ) -> Result<Vec<Violation>, InputError> {
        ensure_positive("toolstring", "max_weight", max_weight)?;
        for section in wellbore {
            section.validate()?;
        }

        let resolved: Vec<Option<&Equipment>> =
            tool_string.iter().map(|id| self.catalog.get(id)).collect();

        let mut violations: Vec<Violation> = tool_string
            .iter()
            .zip(&resolved)
            .filter(|(_, eq)| eq.is_none())
            .map(|(id, _)| unknown_equipment(id))
            .collect();

        let tools: Vec<&Equipment> = resolved.iter().flatten().copied().collect();
        if tools.is_empty() {
            return Ok(violations);
        }

        let total_weight: f64 = tools.iter().map(|t| t.weight).sum();
        if total_weight > max_weight {
            debug!(total_weight, max_weight, "Tool string over weight limit");
            violations.push(weight_exceeded(&tools, total_weight, max_weight));
        }

        let widest = tools
            .iter()
            .copied()
            .max_by(|a, b| a.od.total_cmp(&b.od));
        if let Some(widest) = widest {
            violations.extend(
                wellbore
                    .iter()
                    .filter_map(|section| clearance_violation(section, widest)),
            );
        }

        violations.extend(
            tools
                .windows(2)
                .filter_map(|pair| bore_clash(pair[0], pair[1])),
        );

        Ok(violations)
    }

    /// Full validation report with string totals.
    pub fn validate(
        &self,
        tool_string: &[String],
        wellbore: &[WellboreSection],
        max_weight: f64,
    ) -> Result<ToolstringReport, InputError> {
        let violations = self.check_toolstring_assembly(tool_string, wellbore, max_weight)?;
        let tools: Vec<&Equipment> = tool_string.iter().filter_map(|id| self.catalog.get(id)).collect();

        let critical_count = violations.iter().filter(|v| v.is_critical()).count();
        let stop_job_required = violations.iter().any(Violation::is_stop_job);

        info!(
            tools = tool_string.len(),
            sections = wellbore.len(),
            violations = violations.len(),
            critical = critical_count,
            "Toolstring validation complete"
        );

        Ok(ToolstringReport {
            valid: critical_count == 0,
            critical_count,
            stop_job_required,
            tool_count: tools.len(),
            total_weight: tools.iter().map(|t| t.weight).sum(),
            total_length: tools.iter().map(|t| t.length).sum(),
            max_od: tools.iter().map(|t| t.od).reduce(f64::max),
            violations,
        })
    }
}

fn unknown_equipment(id: &str) -> Violation {
    Violation::stop_job(ViolationCategory::UnknownEquipment)
        .description(format!("Unknown equipment ID: {id}"))
        .element(id)
        .assumption("Equipment must exist in catalog")
        .rule("Equipment catalog lookup")
        .recommendation("Verify equipment ID or add to catalog")
        .build()
}

fn weight_exceeded(tools: &[&Equipment], total_weight: f64, max_weight: f64) -> Violation {
    let mut builder = Violation::finding(Severity::High, ViolationCategory::WeightLimitExceeded)
        .id(ViolationCategory::WeightLimitExceeded.code())
        .description(format!(
            "Tool string weight {total_weight:.0} lbs exceeds limit {max_weight:.0} lbs"
        ))
        .assumption(format!("Maximum conveyance weight limit is {max_weight} lbs"))
        .rule("Weight limit check (wireline/slickline standard)")
        .confidence(0.95)
        .recommendation("Reduce tool count or use lighter alternatives");
    for tool in tools {
        builder = builder.element(&tool.id);
    }
    builder.build()
}

fn clearance_violation(section: &WellboreSection, widest: &Equipment) -> Option<Violation> {
    let clearance = section.casing_id - widest.od;
    if clearance >= MIN_CLEARANCE_IN {
        return None;
    }

    let builder = if clearance < 0.0 {
        Violation::stop_job(ViolationCategory::ClearanceInsufficient)
            .recommendation("Reduce tool OD or use smaller string")
    } else {
        Violation::finding(Severity::High, ViolationCategory::ClearanceInsufficient)
            .confidence(0.95)
            .recommendation("Consider stuck pipe risk mitigation")
    };

    Some(
        builder
            .id(format!(
                "{}:{}:{}",
                ViolationCategory::ClearanceInsufficient.code(),
                section.name,
                widest.id
            ))
            .description(format!(
                "{}: Clearance {clearance:.3}\" insufficient (min {MIN_CLEARANCE_IN}\"); casing ID {:.3}\", max tool OD {:.3}\"",
                section.name, section.casing_id, widest.od
            ))
            .element(&widest.id)
            .depth(DepthInterval::spanning(section.top_depth, section.bottom_depth))
            .standard("NORSOK D-010 / Industry standard clearance requirements")
            .assumption(format!("Minimum {MIN_CLEARANCE_IN}\" radial clearance required for safe passage"))
            .rule("casing_id - max_tool_od < min_clearance")
            .build(),
    )
}

fn bore_clash(upper: &Equipment, lower: &Equipment) -> Option<Violation> {
    let bore = upper.id_bore?;
    if lower.od <= bore {
        return None;
    }
    Some(
        Violation::stop_job(ViolationCategory::OdIdClash)
            .description(format!(
                "{} ID {bore:.3}\" < {} OD {:.3}\"",
                upper.label(),
                lower.label(),
                lower.od
            ))
            .element(&upper.id)
            .element(&lower.id)
            .assumption("Lower tool must pass through upper tool bore")
            .rule("Physical constraint: OD must be less than ID")
            .recommendation(format!(
                "Replace {} with smaller OD tool or resequence string",
                lower.label()
            ))
            .build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver() -> ConstraintSolver {
        let items = [
            Equipment::new("SL-001", "Rope Socket", "slickline", 1.5, 2.0, 5.0).unwrap(),
            Equipment::new("SL-003", "Collar Locator", "slickline", 1.625, 3.0, 8.0).unwrap(),
            Equipment::new("PK-001", "Packer", "completion", 3.75, 6.0, 180.0)
                .unwrap()
                .with_bore(1.875),
            Equipment::new("GR-001", "Gauge Ring", "slickline", 2.5, 1.0, 10.0).unwrap(),
            Equipment::new("HV-001", "Heavy Sinker", "slickline", 1.5, 10.0, 30_000.0).unwrap(),
        ];
        ConstraintSolver::new(Arc::new(EquipmentCatalog::from_equipment(items).unwrap()))
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn casing(id: f64) -> WellboreSection {
        WellboreSection::new("Production Casing", 0.0, 10_000.0, id).unwrap()
    }

    #[test]
    fn test_clean_string() {
        let v = solver().check_toolstring_assembly(&ids(&["SL-001", "SL-003"]), &[casing(7.0)], DEFAULT_MAX_WEIGHT_LBS).unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn test_unknown_id_is_critical_stop() {
        let v = solver().check_toolstring_assembly(&ids(&["SL-001", "XX-999"]), &[casing(7.0)], DEFAULT_MAX_WEIGHT_LBS).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category(), ViolationCategory::UnknownEquipment);
        assert!(v[0].is_stop_job());
        assert!(v[0].description().contains("XX-999"));
    }

    #[test]
    fn test_only_unknown_ids_stops_after_lookup() {
        let v = solver().check_toolstring_assembly(&ids(&["A", "B"]), &[casing(1.0)], 1.0).unwrap();
        assert_eq!(v.len(), 2);
        assert!(v.iter().all(|x| x.category() == ViolationCategory::UnknownEquipment));
    }

    #[test]
    fn test_weight_limit() {
        let v = solver().check_toolstring_assembly(&ids(&["HV-001", "HV-001"]), &[], DEFAULT_MAX_WEIGHT_LBS).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].severity(), Severity::High);
        assert!((v[0].confidence() - 0.95).abs() < f64::EPSILON);
        assert!(v[0].description().contains("60000 lbs"));
    }

    #[test]
    fn test_tight_clearance_is_high() {
        let v = solver().check_toolstring_assembly(&ids(&["GR-001"]), &[casing(2.6)], DEFAULT_MAX_WEIGHT_LBS).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].severity(), Severity::High);
        assert!(!v[0].is_stop_job());
    }

    #[test]
    fn test_negative_clearance_is_critical_per_section() {
        let sections = [
            WellboreSection::new("Upper", 0.0, 3000.0, 7.0).unwrap(),
            WellboreSection::new("Liner", 3000.0, 9000.0, 2.0).unwrap(),
            WellboreSection::new("Nipple", 9000.0, 9001.0, 2.2).unwrap(),
        ];
        let v = solver().check_toolstring_assembly(&ids(&["GR-001"]), &sections, DEFAULT_MAX_WEIGHT_LBS).unwrap();
        assert_eq!(v.len(), 2);
        assert!(v.iter().all(|x| x.is_critical() && x.is_stop_job()));
        assert_ne!(v[0].id(), v[1].id());
    }

    #[test]
    fn test_bore_clash_on_adjacent_pair() {
        let v = solver().check_toolstring_assembly(&ids(&["PK-001", "GR-001"]), &[casing(7.0)], DEFAULT_MAX_WEIGHT_LBS).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category(), ViolationCategory::OdIdClash);
        assert_eq!(v[0].elements(), ["PK-001".to_string(), "GR-001".to_string()]);
    }

    #[test]
    fn test_clash_checked_across_unknown_id() {
        let v = solver().check_toolstring_assembly(&ids(&["PK-001", "XX-1", "GR-001"]), &[casing(7.0)], DEFAULT_MAX_WEIGHT_LBS).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].category(), ViolationCategory::UnknownEquipment);
        assert_eq!(v[1].category(), ViolationCategory::OdIdClash);
        assert_eq!(v[1].elements(), ["PK-001".to_string(), "GR-001".to_string()]);
    }

    #[test]
    fn test_rejects_bad_weight_ceiling() {
        for limit in [f64::NAN, 0.0, -5.0] {
            let err = solver()
                .check_toolstring_assembly(&ids(&["SL-001"]), &[casing(7.0)], limit)
                .unwrap_err();
            assert!(err.to_string().contains("max_weight"));
        }
    }

    #[test]
    fn test_rejects_mutated_section() {
        let mut section = casing(7.0);
        section.casing_id = f64::NAN;
        assert!(solver().validate(&ids(&["SL-001"]), &[section], DEFAULT_MAX_WEIGHT_LBS).is_err());
    }

    #[test]
    fn test_report_totals() {
        let report = solver().validate(&ids(&["SL-001", "SL-003", "XX-1"]), &[casing(7.0)], DEFAULT_MAX_WEIGHT_LBS).unwrap();
        assert!(!report.valid);
        assert_eq!(report.critical_count, 1);
        assert_eq!(report.tool_count, 2);
        assert!((report.total_weight - 13.0).abs() < 1e-9);
        assert!((report.total_length - 5.0).abs() < 1e-9);
        assert_eq!(report.max_od, Some(1.625));
    }
}
