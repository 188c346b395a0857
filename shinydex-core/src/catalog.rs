//! The static catalog: named regions, each an ordered list of item ids.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CoreError;

/// One named group of collectible items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRegion {
    pub name: String,
    /// Item ids in display order.
    #[serde(alias = "pokemons")]
    pub items: Vec<String>,
}

/// Read-only list of regions, loaded once at startup.
///
/// Ids are expected to be unique within a region. The same id showing up in
/// more than one region is tolerated; every occurrence is rendered and
/// patched together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    regions: Vec<CatalogRegion>,
}

impl Catalog {
    pub fn new(regions: Vec<CatalogRegion>) -> Self {
        Self { regions }
    }

    /// Parse a catalog from its JSON text (an array of regions).
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let regions: Vec<CatalogRegion> = serde_json::from_str(json)?;
        debug!("Parsed catalog with {} regions", regions.len());
        Ok(Self { regions })
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| CoreError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(
            "Loaded catalog from {} ({} regions, {} items)",
            path.display(),
            catalog.regions.len(),
            catalog.item_count()
        );
        Ok(catalog)
    }

    pub fn regions(&self) -> &[CatalogRegion] {
        &self.regions
    }

    /// Total number of tiles, counting repeated ids once per occurrence.
    pub fn item_count(&self) -> usize {
        self.regions.iter().map(|r| r.items.len()).sum()
    }
}
