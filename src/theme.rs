//! Dark/light palettes applied onto egui's visuals.

use clap::ValueEnum;
use egui::{Color32, Context, Visuals};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Named colors for one theme; every widget tint in the app comes from here.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub fg_primary: Color32,
    pub fg_accent: Color32,
    pub start_button: Color32,
    pub start_button_active: Color32,
    pub stop_button: Color32,
    pub stop_button_active: Color32,
    pub record_button: Color32,
    pub record_button_active: Color32,
}

const DARK: Palette = Palette {
    bg_primary: Color32::from_rgb(44, 62, 80),
    bg_secondary: Color32::from_rgb(52, 73, 94),
    fg_primary: Color32::from_rgb(236, 240, 241),
    fg_accent: Color32::from_rgb(241, 196, 15),
    start_button: Color32::from_rgb(39, 174, 96),
    start_button_active: Color32::from_rgb(46, 204, 113),
    stop_button: Color32::from_rgb(192, 57, 43),
    stop_button_active: Color32::from_rgb(231, 76, 60),
    record_button: Color32::from_rgb(52, 152, 219),
    record_button_active: Color32::from_rgb(41, 128, 185),
};

const LIGHT: Palette = Palette {
    bg_primary: Color32::from_rgb(240, 240, 240),
    bg_secondary: Color32::from_rgb(255, 255, 255),
    fg_primary: Color32::from_rgb(51, 51, 51),
    fg_accent: Color32::from_rgb(0, 80, 157),
    start_button: Color32::from_rgb(92, 184, 92),
    start_button_active: Color32::from_rgb(76, 174, 76),
    stop_button: Color32::from_rgb(217, 83, 79),
    stop_button_active: Color32::from_rgb(201, 48, 44),
    record_button: Color32::from_rgb(51, 122, 183),
    record_button_active: Color32::from_rgb(40, 96, 144),
};

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => DARK,
            Theme::Light => LIGHT,
        }
    }

    /// Map the palette onto egui's visuals and install them on the context.
    pub fn apply(&self, theme: Theme, ctx: &Context) {
        let mut visuals = match theme {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        };
        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.override_text_color = Some(self.fg_primary);
        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke.color = self.fg_primary;
        visuals.widgets.inactive.bg_fill = self.bg_secondary;
        visuals.widgets.inactive.weak_bg_fill = self.bg_secondary;
        visuals.widgets.hovered.bg_fill = self.record_button;
        visuals.widgets.hovered.weak_bg_fill = self.record_button;
        visuals.widgets.active.bg_fill = self.record_button_active;
        visuals.widgets.active.weak_bg_fill = self.record_button_active;
        visuals.selection.bg_fill = self.record_button;
        visuals.hyperlink_color = self.fg_accent;
        ctx.set_visuals(visuals);
    }
}
