//! Map geometry data structures
//!
//! In-memory representation of the clickable map: one polygon outline per
//! region, authored in the 1000x1000 logical space, keyed by a stable
//! positive region id.

use eframe::egui::{Pos2, Rect};

/// The full clickable map.
#[derive(Debug, Clone)]
pub struct MapGeometry {
    /// Region shapes in draw order
    pub regions: Vec<RegionShape>,
}

/// One selectable region outline.
#[derive(Debug, Clone)]
pub struct RegionShape {
    /// Stable region id, matches the registry key
    pub id: u32,

    /// Polygon outline in logical coordinates (closed implicitly)
    pub outline: Vec<Pos2>,

    /// Cached outline bounding box
    pub bbox: Rect,
}

impl RegionShape {
    pub fn new(id: u32, outline: Vec<Pos2>) -> Self {
        let bbox = bounds_of(&outline);
        Self { id, outline, bbox }
    }

    /// Point-in-polygon test (even-odd rule) with a bounding-box pre-check.
    pub fn contains(&self, point: Pos2) -> bool {
        if self.outline.len() < 3 || !self.bbox.contains(point) {
            return false;
        }
        let mut inside = false;
        let n = self.outline.len();
        let mut j = n - 1;
        for i in 0..n {
            let a = self.outline[i];
            let b = self.outline[j];
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

impl MapGeometry {
    pub fn new(regions: Vec<RegionShape>) -> Self {
        Self { regions }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Union bounding box of all regions in logical space.
    ///
    /// Zero-sized for an empty map; callers tolerate that and defer fitting.
    pub fn bounds(&self) -> Rect {
        let mut bounds = Rect::NOTHING;
        for region in &self.regions {
            bounds = bounds.union(region.bbox);
        }
        if bounds.is_negative() {
            Rect::from_min_size(Pos2::ZERO, eframe::egui::Vec2::ZERO)
        } else {
            bounds
        }
    }

    /// Top-most region containing the point, if any.
    ///
    /// Later regions draw over earlier ones, so iterate in reverse.
    pub fn hit_test(&self, point: Pos2) -> Option<u32> {
        self.regions
            .iter()
            .rev()
            .find(|region| region.contains(point))
            .map(|region| region.id)
    }
}

fn bounds_of(points: &[Pos2]) -> Rect {
    let mut bounds = Rect::NOTHING;
    for p in points {
        bounds.extend_with(*p);
    }
    if bounds.is_negative() {
        Rect::from_min_size(Pos2::ZERO, eframe::egui::Vec2::ZERO)
    } else {
        bounds
    }
}
