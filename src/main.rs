//! Atlas Studio - Prefecture Matching Game
//! Built with egui for native Wayland support

use std::path::Path;
use std::time::Instant;

use eframe::egui::{self, Align2, Color32, RichText, Stroke, Vec2};

use atlas_studio::config::{Preferences, ThemeChoice};
use atlas_studio::game::{GameMode, GameSession, VisualBoard, VisualState};
use atlas_studio::map::{self, MapGeometry, MapLoadError, MapViewer};
use atlas_studio::registry::RegionRegistry;
use atlas_studio::theme::Theme;

/// Map geometry asset, fetched at startup
const MAP_ASSET: &str = "assets/japan_map.json";

/// Standard spacing between sections
const SECTION_SPACING: f32 = 12.0;
/// Small spacing for tight layouts
const TIGHT_SPACING: f32 = 4.0;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("都道府県マスター"),
        ..Default::default()
    };

    eframe::run_native(
        "Atlas Studio",
        options,
        Box::new(|_cc| match AtlasStudio::new() {
            Ok(app) => Ok(Box::new(app)),
            Err(e) => Err(e.into()),
        }),
    )
}

/// Main application state
struct AtlasStudio {
    theme_choice: ThemeChoice,
    theme: Theme,

    registry: RegionRegistry,

    /// Loaded map, or the reason the session is non-interactive
    geometry: Result<MapGeometry, MapLoadError>,
    viewer: MapViewer,

    session: GameSession,
    board: VisualBoard,

    show_completion: bool,
}

impl AtlasStudio {
    fn new() -> anyhow::Result<Self> {
        let prefs = Preferences::load();
        let registry = RegionRegistry::embedded()?;

        let geometry = map::load_file(Path::new(MAP_ASSET));
        match &geometry {
            Ok(map) => log::info!("loaded {} map regions from {}", map.len(), MAP_ASSET),
            Err(e) => log::error!("map load failed: {}", e),
        }

        let total = geometry.as_ref().map(MapGeometry::len).unwrap_or(0);
        Ok(Self {
            theme_choice: prefs.theme,
            theme: Theme::from_choice(prefs.theme),
            registry,
            geometry,
            viewer: MapViewer::new(),
            session: GameSession::new(total, GameMode::QuizByName),
            board: VisualBoard::new(),
            show_completion: false,
        })
    }

    fn toggle_theme(&mut self) {
        self.theme_choice = self.theme_choice.toggled();
        self.theme = Theme::from_choice(self.theme_choice);
        Preferences {
            theme: self.theme_choice,
        }
        .save();
    }

    fn show_top_bar(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        ui.horizontal(|ui| {
            ui.add_space(TIGHT_SPACING);
            ui.label(
                RichText::new("都道府県マスター")
                    .strong()
                    .size(18.0)
                    .color(theme.fg_bright),
            );
            ui.add_space(SECTION_SPACING);

            let mut mode = self.session.mode();
            egui::ComboBox::from_id_salt("game_mode")
                .selected_text(mode.label())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut mode, GameMode::QuizByName, GameMode::QuizByName.label());
                    ui.selectable_value(
                        &mut mode,
                        GameMode::QuizByCapital,
                        GameMode::QuizByCapital.label(),
                    );
                    ui.selectable_value(&mut mode, GameMode::Memorize, GameMode::Memorize.label());
                });
            if mode != self.session.mode() {
                self.session.set_mode(mode, &mut self.board);
                self.board.close_record();
            }

            if ui.button("リセット").clicked() {
                self.session.reset(&mut self.board);
                self.board.close_record();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(TIGHT_SPACING);
                let icon = match self.theme_choice {
                    ThemeChoice::Dark => "☀",
                    ThemeChoice::Light => "🌙",
                };
                if ui.button(icon).on_hover_text("テーマ切替").clicked() {
                    self.toggle_theme();
                }

                if self.session.mode() != GameMode::Memorize {
                    let total = self.geometry.as_ref().map(MapGeometry::len).unwrap_or(0);
                    ui.label(
                        RichText::new(format!("クリア: {} / {}", self.board.progress(), total))
                            .color(theme.fg),
                    );
                }
            });
        });
    }

    fn show_list_panel(&mut self, ui: &mut egui::Ui, now: Instant) {
        let theme = self.theme;
        let mode = self.session.mode();

        ui.add_space(TIGHT_SPACING);
        let heading = match mode {
            GameMode::QuizByName => "都道府県名",
            GameMode::QuizByCapital => "県庁所在地",
            GameMode::Memorize => "一覧",
        };
        ui.label(RichText::new(heading).strong().color(theme.fg_bright));
        ui.separator();

        let mut tapped = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for region in self.registry.iter() {
                let state = self.board.list_state(region.id);

                let text = match mode {
                    GameMode::QuizByName => region.name.clone(),
                    GameMode::QuizByCapital => region.capital.clone(),
                    GameMode::Memorize => format!("{}（{}）", region.name, region.capital),
                };
                let (fill, text_color) = match state {
                    VisualState::Selected => (theme.accent, theme.fg_bright),
                    VisualState::Cleared => (theme.success.gamma_multiply(0.35), theme.fg_dim),
                    VisualState::Shake => (theme.error.gamma_multiply(0.5), theme.fg_bright),
                    VisualState::Highlighted => (theme.region_highlight, theme.fg_bright),
                    VisualState::None => (Color32::TRANSPARENT, theme.fg),
                };

                let mut rich = RichText::new(text).color(text_color);
                if state == VisualState::Cleared {
                    rich = rich.strikethrough();
                }
                let button = egui::Button::new(rich)
                    .fill(fill)
                    .min_size(Vec2::new(ui.available_width(), 24.0));
                if ui.add(button).clicked() {
                    tapped = Some(region.id);
                }
            }
        });

        if let Some(id) = tapped {
            self.session
                .select_from_list(id, now, &self.registry, &mut self.board);
        }
    }

    fn show_map_panel(&mut self, ui: &mut egui::Ui, now: Instant) {
        let theme = self.theme;
        // Split borrows so the viewer can read board/registry while running
        let Self {
            viewer,
            board,
            registry,
            session,
            geometry,
            ..
        } = self;

        match geometry {
            Ok(map) => {
                let tapped = viewer.ui(
                    ui,
                    map,
                    &theme,
                    now,
                    &|id| board.map_state(id),
                    &|id, state| {
                        let group = registry.lookup(id).map(|r| r.region.as_str()).unwrap_or("");
                        theme.region_fill(state, group)
                    },
                );
                if let Some(id) = tapped {
                    session.select_from_map(id, now, registry, board);
                }
            }
            Err(e) => {
                // The one fatal condition: no map, no game
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new("地図の読み込みに失敗しました。")
                                .size(18.0)
                                .color(theme.error),
                        );
                        ui.label(RichText::new(e.to_string()).small().color(theme.fg_dim));
                    });
                });
            }
        }
    }

    fn show_info_modal(&mut self, ctx: &egui::Context) {
        let Some(record) = self.board.record().cloned() else {
            return;
        };
        let theme = self.theme;
        let mut open = true;
        let mut next_clicked = false;

        egui::Window::new(RichText::new(&record.name).strong().size(20.0))
            .id(egui::Id::new("info_modal"))
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.add_space(TIGHT_SPACING);
                ui.label(format!("県庁所在地: {}", record.capital));
                ui.label(format!("地方: {}", record.region));
                if !record.neighbors.is_empty() {
                    ui.label(format!("隣接: {}", record.neighbors.join("、")));
                }
                if !record.specialties.is_empty() {
                    ui.label(format!("特産品: {}", record.specialties.join("、")));
                }
                if !record.relation.is_empty() {
                    ui.add_space(TIGHT_SPACING);
                    ui.label(RichText::new(&record.relation).color(theme.fg_dim));
                }
                ui.add_space(SECTION_SPACING);
                if ui.button("次へ").clicked() {
                    next_clicked = true;
                }
            });

        if !open || next_clicked {
            self.board.close_record();
        }
    }

    fn show_completion_modal(&mut self, ctx: &egui::Context) {
        if !self.show_completion {
            return;
        }
        let mut close = false;

        egui::Window::new("🎉 全問正解！")
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("おめでとうございます！");
                ui.label("最初からやり直します。");
                ui.add_space(SECTION_SPACING);
                if ui.button("OK").clicked() {
                    close = true;
                }
            });

        if close {
            self.show_completion = false;
        }
    }

    fn apply_visuals(&self, ctx: &egui::Context) {
        let theme = self.theme;
        let mut visuals = if theme.bg.r() > 128 {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        };
        visuals.panel_fill = theme.bg;
        visuals.window_fill = theme.panel_bg;
        visuals.widgets.noninteractive.bg_fill = theme.panel_bg;
        visuals.widgets.hovered.bg_fill = theme.list_hover;
        visuals.widgets.active.bg_fill = theme.accent;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, theme.accent);
        ctx.set_visuals(visuals);
    }
}

impl eframe::App for AtlasStudio {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Fire scheduled feedback actions before handling new input
        self.session.tick(now, &self.registry, &mut self.board);
        if self.board.take_completion() {
            self.show_completion = true;
        }

        self.apply_visuals(ctx);
        let theme = self.theme;

        egui::TopBottomPanel::top("top_bar")
            .exact_height(40.0)
            .frame(
                egui::Frame::none()
                    .fill(theme.topbar_bg)
                    .inner_margin(egui::Margin::symmetric(8.0, 6.0)),
            )
            .show(ctx, |ui| {
                self.show_top_bar(ui);
            });

        egui::SidePanel::right("list_panel")
            .default_width(240.0)
            .width_range(180.0..=360.0)
            .resizable(true)
            .frame(
                egui::Frame::none()
                    .fill(theme.panel_bg)
                    .inner_margin(egui::Margin::symmetric(6.0, 4.0)),
            )
            .show(ctx, |ui| {
                self.show_list_panel(ui, now);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(theme.map_bg))
            .show(ctx, |ui| {
                self.show_map_panel(ui, now);
            });

        self.show_info_modal(ctx);
        self.show_completion_modal(ctx);

        // Wake up for the next scheduled feedback action without input
        if let Some(deadline) = self.session.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}
