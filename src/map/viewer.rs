//! Interactive map widget
//!
//! Native egui rendering of the region polygons with:
//! - Pan (drag) and anchor-preserving zoom (mouse wheel)
//! - Auto-fit on load and on container resize
//! - Region hit-testing for taps
//! - Visual feedback fills (selected / cleared / shake / highlight)

use eframe::egui::{self, Color32, Pos2, Rect, Sense, Stroke, Vec2};
use std::time::{Duration, Instant};

use super::geometry::MapGeometry;
use super::viewport::{FitOutcome, MapViewport};
use crate::game::{RegionId, VisualState};
use crate::theme::Theme;

/// How soon to retry auto-fit when the geometry is not measurable yet.
const FIT_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Map viewer widget owning the pan/zoom state.
pub struct MapViewer {
    pub viewport: MapViewport,

    /// Fit requested but not yet applied (initial load, reset button,
    /// deferred retry)
    needs_fit: bool,

    /// Deferred-retry deadline when the last fit attempt found zero-sized
    /// geometry
    retry_at: Option<Instant>,

    /// Container size of the previous frame, to detect resizes
    last_size: Vec2,

    /// Region currently under the pointer
    hovered: Option<RegionId>,
}

impl Default for MapViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl MapViewer {
    pub fn new() -> Self {
        Self {
            viewport: MapViewport::new(),
            needs_fit: true,
            retry_at: None,
            last_size: Vec2::ZERO,
            hovered: None,
        }
    }

    /// Request an auto-fit on the next frame (zoom-reset button).
    pub fn request_fit(&mut self) {
        self.needs_fit = true;
    }

    /// Render the map and handle gestures. Returns the region tapped this
    /// frame, if any.
    ///
    /// `state_of` reports each region's feedback state; `fill_of` picks its
    /// fill color for that state.
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        geometry: &MapGeometry,
        theme: &Theme,
        now: Instant,
        state_of: &dyn Fn(RegionId) -> VisualState,
        fill_of: &dyn Fn(RegionId, VisualState) -> Color32,
    ) -> Option<RegionId> {
        let available_size = ui.available_size();
        let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());
        let rect = response.rect;

        painter.rect_filled(rect, 0.0, theme.map_bg);

        self.maybe_fit(rect, geometry, now, ui.ctx());
        let clicked = self.handle_input(ui, &response, geometry);

        let transform = self.viewport.transform(rect);
        let mut any_shaking = false;

        for region in &geometry.regions {
            let state = state_of(region.id);
            let fill = fill_of(region.id, state);

            // Transient jitter while the mismatch shake plays
            let jitter = if state == VisualState::Shake {
                any_shaking = true;
                let t = ui.input(|i| i.time);
                Vec2::new(((t * 40.0).sin() * 3.0) as f32, 0.0)
            } else {
                Vec2::ZERO
            };

            let points: Vec<Pos2> = region
                .outline
                .iter()
                .map(|p| transform.to_screen(*p) + jitter)
                .collect();

            let stroke_width = if self.hovered == Some(region.id) { 2.5 } else { 1.0 };
            painter.add(egui::Shape::convex_polygon(
                points,
                fill,
                Stroke::new(stroke_width, theme.region_stroke),
            ));
        }

        self.draw_toolbar(ui, rect, theme);

        if any_shaking {
            ui.ctx().request_repaint();
        }

        clicked
    }

    /// Apply a pending auto-fit, deferring while the container or geometry
    /// is not measurable.
    fn maybe_fit(&mut self, rect: Rect, geometry: &MapGeometry, now: Instant, ctx: &egui::Context) {
        let size = rect.size();
        if (size - self.last_size).length() > 0.5 {
            // Container resized; refit at the native resize cadence
            self.last_size = size;
            self.needs_fit = true;
        }

        if let Some(retry_at) = self.retry_at {
            if now >= retry_at {
                self.retry_at = None;
                self.needs_fit = true;
            } else {
                ctx.request_repaint_after(retry_at - now);
            }
        }

        if self.needs_fit {
            self.needs_fit = false;
            match self.viewport.auto_fit(size, geometry.bounds()) {
                FitOutcome::Applied => {}
                FitOutcome::Deferred => {
                    self.retry_at = Some(now + FIT_RETRY_DELAY);
                    ctx.request_repaint_after(FIT_RETRY_DELAY);
                }
            }
        }
    }

    /// Wheel zoom, drag pan and tap hit-testing.
    fn handle_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        geometry: &MapGeometry,
    ) -> Option<RegionId> {
        let rect = response.rect;
        let transform = self.viewport.transform(rect);

        // Zoom with scroll wheel, anchored under the pointer
        if response.hovered() {
            let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll_delta != 0.0 {
                if let Some(pointer) = response.hover_pos() {
                    let anchor = self.viewport.screen_to_logical(pointer, rect);
                    let factor = 1.0 + scroll_delta * 0.001;
                    self.viewport.zoom_at(anchor, factor);
                }
            }
        }

        // Pan with any drag; the gesture lives exactly as long as the egui
        // drag and needs no explicit release
        if response.dragged() && transform.letterbox > 0.0 {
            self.viewport.pan_by(response.drag_delta() / transform.letterbox);
        }

        // Hover + tap hit-testing
        let mut clicked = None;
        self.hovered = None;
        if let Some(pointer) = response.hover_pos() {
            let logical = self.viewport.screen_to_logical(pointer, rect);
            self.hovered = geometry.hit_test(logical);
        }
        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let logical = self.viewport.screen_to_logical(pointer, rect);
                clicked = geometry.hit_test(logical);
            }
        }

        if self.hovered.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        clicked
    }

    /// Zoom controls in the map corner.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui, rect: Rect, theme: &Theme) {
        let toolbar_rect = Rect::from_min_size(
            rect.min + Vec2::new(10.0, 10.0),
            Vec2::new(40.0, 110.0),
        );

        ui.allocate_ui_at_rect(toolbar_rect, |ui| {
            ui.vertical(|ui| {
                if ui.small_button("+").on_hover_text("拡大").clicked() {
                    self.zoom_about_view_center(rect, 1.2);
                }
                if ui.small_button("⟲").on_hover_text("リセット").clicked() {
                    self.request_fit();
                }
                if ui.small_button("-").on_hover_text("縮小").clicked() {
                    self.zoom_about_view_center(rect, 1.0 / 1.2);
                }
                ui.label(
                    egui::RichText::new(format!("{:.0}%", self.viewport.scale * 100.0))
                        .small()
                        .color(theme.fg_dim),
                );
            });
        });
    }

    fn zoom_about_view_center(&mut self, rect: Rect, factor: f32) {
        let anchor = self.viewport.screen_to_logical(rect.center(), rect);
        self.viewport.zoom_at(anchor, factor);
    }
}
