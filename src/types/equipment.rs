//! Tool catalog entries and wellbore geometry.

use serde::{Deserialize, Serialize};

use crate::error::{
    ensure_finite, ensure_identifier, ensure_non_negative, ensure_ordered, ensure_positive,
    InputError,
};

/// Equipment item from the tool catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawEquipment")]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Outer diameter, inches
    pub od: f64,
    /// Inner bore, inches. Present for hollow tools (packers, valves, subs).
    pub id_bore: Option<f64>,
    /// Length, feet
    pub length: f64,
    /// Weight, lbs
    pub weight: f64,
    /// Maximum working pressure, psi
    pub max_pressure: Option<f64>,
    /// Maximum temperature, degF
    pub max_temperature: Option<f64>,
}

#[derive(Deserialize)]
struct RawEquipment {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
    od: f64,
    #[serde(default)]
    id_bore: Option<f64>,
    #[serde(default)]
    length: f64,
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    max_pressure: Option<f64>,
    #[serde(default)]
    max_temperature: Option<f64>,
}

impl TryFrom<RawEquipment> for Equipment {
    type Error = InputError;

    fn try_from(raw: RawEquipment) -> Result<Self, Self::Error> {
        let equipment = Self {
            id: raw.id,
            name: raw.name,
            category: raw.category,
            od: raw.od,
            id_bore: raw.id_bore,
            length: raw.length,
            weight: raw.weight,
            max_pressure: raw.max_pressure,
            max_temperature: raw.max_temperature,
        };
        equipment.validate()?;
        Ok(equipment)
    }
}

impl Equipment {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        od: f64,
        length: f64,
        weight: f64,
    ) -> Result<Self, InputError> {
        let equipment = Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            od,
            id_bore: None,
            length,
            weight,
            max_pressure: None,
            max_temperature: None,
        };
        equipment.validate()?;
        Ok(equipment)
    }

    /// Hollow tool with an internal passage. Checked when the catalog is built.
    pub fn with_bore(mut self, id_bore: f64) -> Self {
        self.id_bore = Some(id_bore);
        self
    }

    pub fn with_ratings(mut self, max_pressure: Option<f64>, max_temperature: Option<f64>) -> Self {
        self.max_pressure = max_pressure;
        self.max_temperature = max_temperature;
        self
    }

    /// Display label, falling back to the id for unnamed entries.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        let context = format!("equipment '{}'", self.id);
        ensure_identifier("equipment", &self.id)?;
        ensure_positive(&context, "od", self.od)?;
        if let Some(bore) = self.id_bore {
            ensure_positive(&context, "id_bore", bore)?;
        }
        ensure_non_negative(&context, "length", self.length)?;
        ensure_non_negative(&context, "weight", self.weight)?;
        if let Some(p) = self.max_pressure {
            ensure_non_negative(&context, "max_pressure", p)?;
        }
        if let Some(t) = self.max_temperature {
            ensure_finite(&context, "max_temperature", t)?;
        }
        Ok(())
    }
}

/// Wellbore geometry section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawWellboreSection")]
pub struct WellboreSection {
    pub name: String,
    /// ft MD
    pub top_depth: f64,
    /// ft MD
    pub bottom_depth: f64,
    /// Casing inner diameter, inches
    pub casing_id: f64,
    /// Tubing inner diameter, inches
    pub tubing_id: Option<f64>,
    /// Maximum dogleg severity, deg/100ft
    pub max_dls: Option<f64>,
}

#[derive(Deserialize)]
struct RawWellboreSection {
    name: String,
    top_depth: f64,
    bottom_depth: f64,
    casing_id: f64,
    #[serde(default)]
    tubing_id: Option<f64>,
    #[serde(default)]
    max_dls: Option<f64>,
}

impl TryFrom<RawWellboreSection> for WellboreSection {
    type Error = InputError;

    fn try_from(raw: RawWellboreSection) -> Result<Self, Self::Error> {
        let section = Self {
            name: raw.name,
            top_depth: raw.top_depth,
            bottom_depth: raw.bottom_depth,
            casing_id: raw.casing_id,
            tubing_id: raw.tubing_id,
            max_dls: raw.max_dls,
        };
        section.validate()?;
        Ok(section)
    }
}

impl WellboreSection {
    pub fn new(
        name: impl Into<String>,
        top_depth: f64,
        bottom_depth: f64,
        casing_id: f64,
    ) -> Result<Self, InputError> {
        let section = Self {
            name: name.into(),
            top_depth,
            bottom_depth,
            casing_id,
            tubing_id: None,
            max_dls: None,
        };
        section.validate()?;
        Ok(section)
    }

    pub fn with_tubing(mut self, tubing_id: f64) -> Self {
        self.tubing_id = Some(tubing_id);
        self
    }

    pub fn with_max_dls(mut self, dls: f64) -> Self {
        self.max_dls = Some(dls);
        self
    }

    pub fn validate(&self) -> Result<(), InputError> {
        let context = format!("wellbore section '{}'", self.name);
        ensure_ordered(&context, self.top_depth, self.bottom_depth)?;
        ensure_positive(&context, "casing_id", self.casing_id)?;
        if let Some(t) = self.tubing_id {
            ensure_positive(&context, "tubing_id", t)?;
        }
        if let Some(dls) = self.max_dls {
            ensure_non_negative(&context, "max_dls", dls)?;
        }
        Ok(())
    }
}
