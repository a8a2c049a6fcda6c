//! Equipment catalog
//!
//! Read-only lookup of tool dimensions by equipment id. The catalog is
//! immutable once loaded. [`CatalogHandle`] publishes a new catalog by atomic
//! pointer swap, so calls already running keep the snapshot they started with.

mod format;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::toolstring::ConstraintSolver;
use crate::types::Equipment;

use format::CatalogFile;

/// Equipment keyed by id.
#[derive(Debug, Clone, Default)]
pub struct EquipmentCatalog {
    items: HashMap<String, Equipment>,
}

impl EquipmentCatalog {
    /// Build from a list; invalid entries and duplicate ids are rejected.
    pub fn from_equipment(items: impl IntoIterator<Item = Equipment>) -> Result<Self, CatalogError> {
        let mut map = HashMap::new();
        for eq in items {
            eq.validate().map_err(|source| CatalogError::InvalidEntry {
                id: eq.id.clone(),
                source,
            })?;
            if map.contains_key(&eq.id) {
                return Err(CatalogError::DuplicateId(eq.id));
            }
            map.insert(eq.id.clone(), eq);
        }
        Ok(Self { items: map })
    }

    /// Parse the categorized JSON layout: `categories[].equipment[]`.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut items = Vec::new();
        for category in file.categories {
            for entry in category.equipment {
                let id = entry.id.clone();
                let eq = entry
                    .into_equipment(&category.id)
                    .map_err(|source| CatalogError::InvalidEntry { id, source })?;
                items.push(eq);
            }
        }
        Self::from_equipment(items)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&content)?;
        info!(path = %path.display(), items = catalog.len(), "Loaded equipment catalog");
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&Equipment> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Equipment> {
        self.items.values()
    }
}

/// Shared, hot-swappable catalog.
#[derive(Debug)]
pub struct CatalogHandle {
    current: ArcSwap<EquipmentCatalog>,
}

impl CatalogHandle {
    pub fn new(catalog: EquipmentCatalog) -> Self {
        Self {
            current: ArcSwap::from_pointee(catalog),
        }
    }

    /// Catalog as of now. Later swaps do not affect the returned snapshot.
    pub fn snapshot(&self) -> Arc<EquipmentCatalog> {
        self.current.load_full()
    }

    pub fn replace(&self, catalog: EquipmentCatalog) {
        self.current.store(Arc::new(catalog));
    }

    /// Reload from disk. On failure the previous catalog stays in place.
    pub fn reload_from_file(&self, path: &Path) -> Result<(), CatalogError> {
        match EquipmentCatalog::load_from_file(path) {
            Ok(catalog) => {
                self.replace(catalog);
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Catalog reload failed, keeping previous catalog");
                Err(e)
            }
        }
    }

    /// Solver bound to the current snapshot.
    pub fn solver(&self) -> ConstraintSolver {
        ConstraintSolver::new(self.snapshot())
    }
}
