//! Theme definitions for the game UI and map rendering

use eframe::egui::Color32;

use crate::config::ThemeChoice;
use crate::game::VisualState;

/// Application color palette.
#[derive(Clone, Copy)]
pub struct Theme {
    pub bg: Color32,
    pub panel_bg: Color32,
    pub map_bg: Color32,
    pub topbar_bg: Color32,

    pub fg: Color32,
    pub fg_dim: Color32,
    pub fg_bright: Color32,

    pub accent: Color32,
    pub border: Color32,
    pub list_hover: Color32,

    // Map region feedback fills
    pub region_stroke: Color32,
    pub region_selected: Color32,
    pub region_cleared: Color32,
    pub region_shake: Color32,
    pub region_highlight: Color32,

    pub success: Color32,
    pub error: Color32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color32::from_rgb(30, 30, 30),        // #1e1e1e
            panel_bg: Color32::from_rgb(37, 37, 38),  // #252526
            map_bg: Color32::from_rgb(26, 26, 26),    // #1a1a1a
            topbar_bg: Color32::from_rgb(45, 45, 45), // #2d2d2d

            fg: Color32::from_rgb(204, 204, 204),        // #cccccc
            fg_dim: Color32::from_rgb(128, 128, 128),    // #808080
            fg_bright: Color32::from_rgb(255, 255, 255), // #ffffff

            accent: Color32::from_rgb(0, 120, 212),    // #0078d4
            border: Color32::from_rgb(60, 60, 60),     // #3c3c3c
            list_hover: Color32::from_rgb(42, 45, 46), // #2a2d2e

            region_stroke: Color32::from_rgb(20, 20, 20),
            region_selected: Color32::from_rgb(255, 196, 0), // amber
            region_cleared: Color32::from_rgb(63, 185, 80),  // #3fb950
            region_shake: Color32::from_rgb(248, 81, 73),    // #f85149
            region_highlight: Color32::from_rgb(26, 140, 255), // #1a8cff

            success: Color32::from_rgb(63, 185, 80),
            error: Color32::from_rgb(248, 81, 73),
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color32::from_rgb(255, 255, 255),        // #ffffff
            panel_bg: Color32::from_rgb(243, 243, 243),  // #f3f3f3
            map_bg: Color32::from_rgb(235, 242, 248),    // pale sea
            topbar_bg: Color32::from_rgb(236, 236, 236), // #ececec

            fg: Color32::from_rgb(51, 51, 51), // #333333
            fg_dim: Color32::from_rgb(128, 128, 128),
            fg_bright: Color32::from_rgb(0, 0, 0),

            accent: Color32::from_rgb(0, 120, 212),
            border: Color32::from_rgb(204, 204, 204),
            list_hover: Color32::from_rgb(232, 232, 232),

            region_stroke: Color32::from_rgb(255, 255, 255),
            region_selected: Color32::from_rgb(255, 170, 0),
            region_cleared: Color32::from_rgb(46, 160, 67),
            region_shake: Color32::from_rgb(218, 54, 51),
            region_highlight: Color32::from_rgb(9, 105, 218),

            success: Color32::from_rgb(46, 160, 67),
            error: Color32::from_rgb(218, 54, 51),
        }
    }

    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    /// Base fill for a region grouped under the given area tag.
    pub fn region_group_fill(&self, group: &str) -> Color32 {
        match group {
            "北海道" => Color32::from_rgb(121, 134, 203),
            "東北" => Color32::from_rgb(77, 182, 172),
            "関東" => Color32::from_rgb(229, 115, 115),
            "中部" => Color32::from_rgb(255, 183, 77),
            "近畿" => Color32::from_rgb(186, 104, 200),
            "中国" => Color32::from_rgb(100, 181, 246),
            "四国" => Color32::from_rgb(174, 213, 129),
            "九州" => Color32::from_rgb(240, 98, 146),
            _ => Color32::from_rgb(144, 164, 174),
        }
    }

    /// Fill for a map region. Feedback state takes precedence over the
    /// group color.
    pub fn region_fill(&self, state: VisualState, group: &str) -> Color32 {
        match state {
            VisualState::Selected => self.region_selected,
            VisualState::Cleared => self.region_cleared,
            VisualState::Shake => self.region_shake,
            VisualState::Highlighted => self.region_highlight,
            VisualState::None => self.region_group_fill(group),
        }
    }
}
