//! Viewport transform engine for the map canvas
//!
//! Maintains a uniform scale + translation over the fixed 1000x1000 logical
//! space the map geometry is authored in. The effective transform is
//! "translate then scale" in logical units; the host letterboxes the logical
//! square into the container ("contain" fit) before this transform applies.

use eframe::egui::{Pos2, Rect, Vec2};

/// Side length of the logical coordinate space the geometry is authored in.
pub const LOGICAL_SIZE: f32 = 1000.0;

/// Zoom bounds for interactive (wheel/button) zooming.
pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 8.0;

/// Lower zoom bound for auto-fit. Wider than the interactive bound so very
/// large geometry can still be shrunk to fit.
pub const FIT_MIN_ZOOM: f32 = 0.2;

/// Physical padding (screen units) kept around the geometry when fitting.
pub const FIT_PADDING: f32 = 20.0;

/// Outcome of an auto-fit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    /// Transform was recomputed and applied
    Applied,
    /// Geometry or container not measurable yet; retry shortly
    Deferred,
}

/// Pan/zoom state over the logical map space.
///
/// Owned exclusively by the map viewer; mutated only through the gesture,
/// zoom and fit operations below. Never persisted - re-derived by auto-fit
/// on every load and resize.
#[derive(Debug, Clone, Copy)]
pub struct MapViewport {
    /// Current zoom level (1.0 = geometry at authored size)
    pub scale: f32,

    /// Logical-space offset applied before scaling
    pub translate: Vec2,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl MapViewport {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }

    /// Full logical -> screen mapping for the given container rect,
    /// including the host's letterbox of the logical square.
    pub fn transform(&self, container: Rect) -> MapTransform {
        let size = container.size();
        let letterbox = (size.x.min(size.y) / LOGICAL_SIZE).max(0.0);
        // "Contain" fit centers the logical square inside the container
        let origin = container.min
            + Vec2::new(
                (size.x - letterbox * LOGICAL_SIZE) / 2.0,
                (size.y - letterbox * LOGICAL_SIZE) / 2.0,
            );
        MapTransform {
            origin,
            letterbox,
            translate: self.translate,
            scale: self.scale,
        }
    }

    /// Recover the logical point under a screen position.
    ///
    /// If the container has not been laid out yet (zero size) the inverse is
    /// undefined; the raw point is returned unchanged rather than failing.
    pub fn screen_to_logical(&self, screen: Pos2, container: Rect) -> Pos2 {
        let transform = self.transform(container);
        if transform.letterbox <= 0.0 {
            return screen;
        }
        transform.to_logical(screen)
    }

    /// Multiply the zoom level by `factor`, keeping `anchor` (a logical
    /// point) fixed at the same screen position across the change.
    ///
    /// At the clamp bounds the scale delta is zero, so repeated calls
    /// leave both scale and translation untouched.
    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        let new_scale = (self.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.translate += anchor.to_vec2() * (self.scale - new_scale);
        self.scale = new_scale;
    }

    /// Pan by a logical-space delta. Unbounded - the map is a canvas, not a
    /// page.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    /// Compute the scale and translation that center `bbox` inside a
    /// container of `container_size` with [`FIT_PADDING`] on every side.
    ///
    /// Accounts for the host letterboxing the logical square before this
    /// engine's transform applies. A zero-sized bounding box means the
    /// geometry is not measurable yet; the caller should retry after a short
    /// delay.
    pub fn auto_fit(&mut self, container_size: Vec2, bbox: Rect) -> FitOutcome {
        let (w, h) = (container_size.x, container_size.y);
        if w <= 0.0 || h <= 0.0 {
            return FitOutcome::Deferred;
        }
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return FitOutcome::Deferred;
        }

        // How the host scales the logical grid onto the screen
        let letterbox = w.min(h) / LOGICAL_SIZE;

        let scale_x = (w - FIT_PADDING * 2.0) / (bbox.width() * letterbox);
        let scale_y = (h - FIT_PADDING * 2.0) / (bbox.height() * letterbox);
        self.scale = scale_x.min(scale_y).clamp(FIT_MIN_ZOOM, MAX_ZOOM);

        // The container midpoint always lands on the logical midpoint under
        // "contain" centering, so (L/2, L/2) is the fixed anchor for fitting.
        let center = bbox.center();
        self.translate = Vec2::new(
            LOGICAL_SIZE / 2.0 - center.x * self.scale,
            LOGICAL_SIZE / 2.0 - center.y * self.scale,
        );

        FitOutcome::Applied
    }
}

/// Composed logical -> screen transform for one frame.
#[derive(Debug, Clone, Copy)]
pub struct MapTransform {
    /// Screen position of the logical origin under letterboxing alone
    pub origin: Pos2,
    /// Host's own "contain" scale factor
    pub letterbox: f32,
    translate: Vec2,
    scale: f32,
}

impl MapTransform {
    pub fn to_screen(&self, logical: Pos2) -> Pos2 {
        let placed = Pos2::new(
            logical.x * self.scale + self.translate.x,
            logical.y * self.scale + self.translate.y,
        );
        self.origin + placed.to_vec2() * self.letterbox
    }

    pub fn to_logical(&self, screen: Pos2) -> Pos2 {
        let placed = (screen - self.origin) / self.letterbox;
        Pos2::new(
            (placed.x - self.translate.x) / self.scale,
            (placed.y - self.translate.y) / self.scale,
        )
    }

    /// Screen distance covered by one logical unit.
    pub fn logical_unit(&self) -> f32 {
        self.letterbox * self.scale
    }
}
