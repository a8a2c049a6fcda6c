//! On-disk equipment catalog layout.
//!
//! ```json
//! {"categories": [{"id": "slickline", "name": "Slickline Tools",
//!   "equipment": [{"id": "SL-001", "name": "Rope Socket", "od": 1.5,
//!                  "length": 2.0, "weight": 5.0,
//!                  "pressureRating": 15000, "tempRating": 350}]}]}
//! ```
//!
//! A rating of `0` or a missing rating means "not rated".

use serde::Deserialize;

use crate::error::InputError;
use crate::types::Equipment;

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogFile {
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryEntry {
    pub id: String,
    #[serde(default)]
    pub equipment: Vec<EquipmentEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EquipmentEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub od: f64,
    #[serde(default, rename = "id_bore")]
    pub id_bore: Option<f64>,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub pressure_rating: Option<f64>,
    #[serde(default)]
    pub temp_rating: Option<f64>,
}

impl EquipmentEntry {
    pub fn into_equipment(self, category: &str) -> Result<Equipment, InputError> {
        let mut equipment = Equipment::new(self.id, self.name, category, self.od, self.length, self.weight)?
            .with_ratings(rated(self.pressure_rating), rated(self.temp_rating));
        if let Some(bore) = self.id_bore.filter(|b| *b != 0.0) {
            equipment = equipment.with_bore(bore);
            equipment.validate()?;
        }
        Ok(equipment)
    }
}

fn rated(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}
