//! Prefecture reference data
//!
//! Read-only lookup table keyed by region id. The table is embedded in the
//! binary; the core never mutates it.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Descriptive record for one prefecture.
#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    /// Stable id, matches the map geometry (JIS prefecture code)
    pub id: u32,

    /// Prefecture name
    pub name: String,

    /// Capital city
    pub capital: String,

    /// Region group tag (Hokkaido, Tohoku, Kanto, ...)
    pub region: String,

    /// Names of bordering prefectures
    pub neighbors: Vec<String>,

    /// Local specialties shown in the info panel
    pub specialties: Vec<String>,

    /// One-line trivia about the prefecture
    pub relation: String,
}

/// Immutable id -> [`Region`] lookup table.
pub struct RegionRegistry {
    regions: BTreeMap<u32, Region>,
}

impl RegionRegistry {
    /// Load the table embedded in the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(include_str!("../assets/prefectures.json"))
            .context("embedded prefecture table is invalid")
    }

    /// Parse a table from JSON (an array of region records).
    pub fn from_json(source: &str) -> Result<Self> {
        let records: Vec<Region> =
            serde_json::from_str(source).context("failed to parse region records")?;
        Self::from_regions(records)
    }

    pub fn from_regions(records: Vec<Region>) -> Result<Self> {
        let mut regions = BTreeMap::new();
        for record in records {
            if record.id == 0 {
                bail!("region id must be a positive integer");
            }
            if let Some(previous) = regions.insert(record.id, record) {
                bail!("duplicate region id {}", previous.id);
            }
        }
        Ok(Self { regions })
    }

    /// Look up a region by id. Absence is normal - callers skip presentation
    /// silently.
    pub fn lookup(&self, id: u32) -> Option<&Region> {
        self.regions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// All regions in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_has_all_prefectures() {
        let registry = RegionRegistry::embedded().unwrap();
        assert_eq!(registry.len(), 47);

        let hokkaido = registry.lookup(1).unwrap();
        assert_eq!(hokkaido.name, "北海道");
        assert_eq!(hokkaido.capital, "札幌市");

        let okinawa = registry.lookup(47).unwrap();
        assert_eq!(okinawa.name, "沖縄県");
    }

    #[test]
    fn test_lookup_missing_id() {
        let registry = RegionRegistry::embedded().unwrap();
        assert!(registry.lookup(0).is_none());
        assert!(registry.lookup(48).is_none());
    }

    #[test]
    fn test_iter_is_ordered_by_id() {
        let registry = RegionRegistry::embedded().unwrap();
        let ids: Vec<u32> = registry.iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_reject_duplicate_ids() {
        let source = r#"[
            {"id": 1, "name": "a", "capital": "b", "region": "c",
             "neighbors": [], "specialties": [], "relation": ""},
            {"id": 1, "name": "d", "capital": "e", "region": "f",
             "neighbors": [], "specialties": [], "relation": ""}
        ]"#;
        assert!(RegionRegistry::from_json(source).is_err());
    }
}
