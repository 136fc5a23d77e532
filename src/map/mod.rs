//! Map Module
//!
//! The clickable vector map: geometry model, JSON asset loading, the
//! pan/zoom viewport transform engine and the interactive egui widget.

pub mod geometry;
pub mod loader;
pub mod viewer;
pub mod viewport;

pub use geometry::{MapGeometry, RegionShape};
pub use loader::{load_file, parse_string, MapLoadError};
pub use viewer::MapViewer;
pub use viewport::{FitOutcome, MapTransform, MapViewport, LOGICAL_SIZE};
