//! Reader theme — two colours, light or dark
//!
//! Light is black on white, dark is white on black. No grays besides the
//! selection highlight. `ThemeState` decides which one is shown.

use crate::prefs::ThemePreferences;
use crate::storage::Result;
use egui::{Color32, Rounding, Stroke, Visuals};
use std::path::PathBuf;
use tracing::{debug, error};

pub struct ReaderColors;

impl ReaderColors {
    pub const WHITE: Color32 = Color32::from_rgb(255, 255, 255);
    pub const BLACK: Color32 = Color32::from_rgb(0, 0, 0);
    pub const SELECTION: Color32 = Color32::from_rgb(160, 160, 160);
}

/// Foreground/background pair for one theme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color32,
    pub bg: Color32,
}

impl Palette {
    pub fn for_theme(dark: bool) -> Self {
        if dark {
            Self {
                fg: ReaderColors::WHITE,
                bg: ReaderColors::BLACK,
            }
        } else {
            Self {
                fg: ReaderColors::BLACK,
                bg: ReaderColors::WHITE,
            }
        }
    }
}

/// Theme preferences plus the file they persist to.
///
/// Every transition updates memory first, then writes both fields. A failed
/// write is logged and returned; the new state is kept either way.
pub struct ThemeState {
    prefs: ThemePreferences,
    path: PathBuf,
}

impl ThemeState {
    pub fn load(path: PathBuf) -> Self {
        let prefs = ThemePreferences::load_from(&path);
        Self { prefs, path }
    }

    pub fn preferences(&self) -> ThemePreferences {
        self.prefs
    }

    pub fn dark_mode(&self) -> bool {
        self.prefs.dark_mode
    }

    pub fn follow_system(&self) -> bool {
        self.prefs.follow_system
    }

    /// Flip dark mode. A manual choice stops following the system.
    pub fn toggle_dark_mode(&mut self) -> Result<()> {
        self.prefs.dark_mode = !self.prefs.dark_mode;
        debug!(dark_mode = self.prefs.dark_mode, "toggled dark mode");
        if self.prefs.follow_system {
            debug!("no longer following the system theme");
            self.prefs.follow_system = false;
        }
        self.persist()
    }

    pub fn toggle_follow_system(&mut self) -> Result<()> {
        self.prefs.follow_system = !self.prefs.follow_system;
        debug!(follow_system = self.prefs.follow_system, "toggled follow system");
        self.persist()
    }

    pub fn effective_theme(&self, system_is_dark: bool) -> bool {
        self.prefs.effective_theme(system_is_dark)
    }

    fn persist(&self) -> Result<()> {
        self.prefs.save_to(&self.path).map_err(|e| {
            error!(path = %self.path.display(), "failed to save theme preferences: {}", e);
            e
        })
    }
}

/// Build two-colour visuals for the given theme
pub fn visuals(dark: bool) -> Visuals {
    let palette = Palette::for_theme(dark);
    let mut visuals = if dark { Visuals::dark() } else { Visuals::light() };

    visuals.override_text_color = Some(palette.fg);
    visuals.window_fill = palette.bg;
    visuals.panel_fill = palette.bg;
    visuals.faint_bg_color = palette.bg;
    visuals.extreme_bg_color = palette.bg;

    visuals.window_rounding = Rounding::ZERO;
    visuals.menu_rounding = Rounding::ZERO;

    visuals.window_stroke = Stroke::new(1.0, palette.fg);

    let two_tone = |ws: &mut egui::style::WidgetVisuals| {
        ws.bg_fill = palette.bg;
        ws.weak_bg_fill = palette.bg;
        ws.bg_stroke = Stroke::new(1.0, palette.fg);
        ws.fg_stroke = Stroke::new(1.0, palette.fg);
        ws.rounding = Rounding::ZERO;
    };
    two_tone(&mut visuals.widgets.noninteractive);
    two_tone(&mut visuals.widgets.inactive);
    two_tone(&mut visuals.widgets.hovered);
    two_tone(&mut visuals.widgets.active);
    two_tone(&mut visuals.widgets.open);

    visuals.window_shadow = egui::epaint::Shadow::NONE;
    visuals.popup_shadow = egui::epaint::Shadow::NONE;

    visuals.selection.bg_fill = ReaderColors::SELECTION;
    visuals.selection.stroke = Stroke::new(1.0, palette.fg);

    visuals
}

/// Apply the theme to an egui context
pub fn apply(ctx: &egui::Context, dark: bool) {
    ctx.set_visuals(visuals(dark));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_in(dir: &tempfile::TempDir) -> ThemeState {
        ThemeState::load(dir.path().join("settings.json"))
    }

    #[test]
    fn test_following_system_shows_system_theme() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        assert!(state.follow_system());
        assert!(state.effective_theme(true));
        assert!(!state.effective_theme(false));
    }

    #[test]
    fn test_toggle_dark_mode_stops_following_system() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);

        state.toggle_dark_mode().unwrap();
        assert!(state.dark_mode());
        assert!(!state.follow_system());
        assert!(state.effective_theme(false));

        // Already manual: only dark mode flips.
        state.toggle_dark_mode().unwrap();
        assert!(!state.dark_mode());
        assert!(!state.follow_system());
        assert!(!state.effective_theme(true));
    }

    #[test]
    fn test_toggle_follow_system_keeps_dark_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);
        state.toggle_dark_mode().unwrap();

        state.toggle_follow_system().unwrap();
        assert!(state.follow_system());
        assert!(state.dark_mode());
        // Stored dark mode is ignored while following a light system.
        assert!(!state.effective_theme(false));

        state.toggle_follow_system().unwrap();
        assert!(!state.follow_system());
        assert!(state.dark_mode());
    }

    #[test]
    fn test_transitions_persist_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);
        state.toggle_dark_mode().unwrap();

        let reloaded = state_in(&dir);
        assert_eq!(reloaded.preferences(), state.preferences());
        assert!(reloaded.dark_mode());
        assert!(!reloaded.follow_system());
    }

    #[test]
    fn test_failed_save_still_transitions() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the settings file should be makes the write fail.
        let path = dir.path().join("settings.json");
        std::fs::create_dir(&path).unwrap();
        let mut state = ThemeState::load(path);

        assert!(state.toggle_follow_system().is_err());
        assert!(!state.follow_system());
    }

    #[test]
    fn test_visuals_invert_for_dark() {
        let light = visuals(false);
        let dark = visuals(true);
        assert!(!light.dark_mode);
        assert!(dark.dark_mode);
        assert_eq!(light.panel_fill, ReaderColors::WHITE);
        assert_eq!(dark.panel_fill, ReaderColors::BLACK);
        assert_eq!(dark.override_text_color, Some(ReaderColors::WHITE));
    }
}
