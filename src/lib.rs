//! Atlas Studio - Prefecture Matching Game
//!
//! Interactive map quiz: pair a clickable prefecture on the map with its
//! entry in the list. Provides the viewport transform engine, the selection
//! state machine, map asset loading and the prefecture data table.

pub mod config;
pub mod game;
pub mod map;
pub mod registry;
pub mod theme;

// Re-export commonly used types
pub use config::{Preferences, ThemeChoice};
pub use game::{
    GameMode, GameSession, InputSource, PresentationSink, RegionId, VisualBoard, VisualState,
};
pub use map::{MapGeometry, MapLoadError, MapViewer, MapViewport};
pub use registry::{Region, RegionRegistry};
pub use theme::Theme;
