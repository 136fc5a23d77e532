//! Map asset loading
//!
//! Parses the JSON map asset into [`MapGeometry`]. A load failure here is
//! the one fatal-to-the-session condition: the app shows a static error in
//! place of the map and stays non-interactive.

use super::geometry::{MapGeometry, RegionShape};
use eframe::egui::Pos2;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("failed to read map asset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse map asset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("region id must be a positive integer")]
    ZeroId,

    #[error("duplicate region id {0}")]
    DuplicateId(u32),

    #[error("region {0} has fewer than 3 outline points")]
    DegenerateOutline(u32),
}

#[derive(Debug, Deserialize)]
struct MapDoc {
    regions: Vec<RegionDoc>,
}

#[derive(Debug, Deserialize)]
struct RegionDoc {
    id: u32,
    outline: Vec<[f32; 2]>,
}

/// Load map geometry from a JSON file.
pub fn load_file(path: &Path) -> Result<MapGeometry, MapLoadError> {
    let content = std::fs::read_to_string(path)?;
    parse_string(&content)
}

/// Parse map geometry from a JSON string.
pub fn parse_string(source: &str) -> Result<MapGeometry, MapLoadError> {
    let doc: MapDoc = serde_json::from_str(source)?;

    let mut seen = HashSet::new();
    let mut regions = Vec::with_capacity(doc.regions.len());
    for region in doc.regions {
        if region.id == 0 {
            return Err(MapLoadError::ZeroId);
        }
        if !seen.insert(region.id) {
            return Err(MapLoadError::DuplicateId(region.id));
        }
        if region.outline.len() < 3 {
            return Err(MapLoadError::DegenerateOutline(region.id));
        }
        let outline = region
            .outline
            .iter()
            .map(|[x, y]| Pos2::new(*x, *y))
            .collect();
        regions.push(RegionShape::new(region.id, outline));
    }

    Ok(MapGeometry::new(regions))
}
