//! Light/dark theme: the persisted mode and the egui visuals derived from it.

use std::fmt;

use eframe::egui;
use log::info;

use crate::storage::{ClientStorage, StorageError};

/// Storage key holding the last selected mode.
pub const THEME_KEY: &str = "posts-frontend-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn visuals(&self) -> egui::Visuals {
        let scheme = AccentScheme::default();
        match self {
            ThemeMode::Light => scheme.light_visuals(),
            ThemeMode::Dark => scheme.dark_visuals(),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holds the process-wide theme mode. Built once at startup and handed to
/// the app; every change is written back to client storage.
#[derive(Debug)]
pub struct ThemeStore {
    storage: ClientStorage,
    mode: ThemeMode,
}

impl ThemeStore {
    pub fn load(storage: ClientStorage) -> Self {
        let mode = storage
            .get(THEME_KEY)
            .and_then(ThemeMode::parse)
            .unwrap_or_default();
        info!("theme {mode} loaded from {}", storage.path().display());
        Self { storage, mode }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Flips the mode. The in-memory mode changes even if persisting fails.
    pub fn toggle(&mut self) -> Result<ThemeMode, StorageError> {
        self.set(self.mode.toggled())?;
        Ok(self.mode)
    }

    pub fn set(&mut self, mode: ThemeMode) -> Result<(), StorageError> {
        self.mode = mode;
        self.storage.set(THEME_KEY, mode.as_str())
    }
}

/// Returns (hue [0-360], saturation [0-1], value [0-1]).
fn rgb_to_hsv(color: egui::Color32) -> (f32, f32, f32) {
    let r = color.r() as f32 / 255.0;
    let g = color.g() as f32 / 255.0;
    let b = color.b() as f32 / 255.0;

    let max = r.max(g).max(b);
    let delta = max - r.min(g).min(b);

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };
    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    (hue, saturation, max)
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> egui::Color32 {
    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = match hue {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    egui::Color32::from_rgb(
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// Scales saturation and brightness, keeping the hue.
fn shade(color: egui::Color32, saturation: f32, value: f32) -> egui::Color32 {
    let (hue, sat, val) = rgb_to_hsv(color);
    hsv_to_rgb(
        hue,
        (sat * saturation).clamp(0.0, 1.0),
        (val * value).clamp(0.0, 1.0),
    )
}

/// Accent colour with darker supporting shades of the same hue.
struct AccentScheme {
    accent: egui::Color32,
    muted: egui::Color32,
    deep: egui::Color32,
}

impl AccentScheme {
    fn from_accent(accent: egui::Color32) -> Self {
        Self {
            accent,
            muted: shade(accent, 0.7, 0.6),
            deep: shade(accent, 0.3, 0.25),
        }
    }

    fn dark_visuals(&self) -> egui::Visuals {
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = self.deep;
        visuals.panel_fill = shade(self.deep, 1.0, 1.2);
        visuals.extreme_bg_color = shade(self.deep, 1.0, 0.5);
        visuals.widgets.hovered.bg_fill = self.muted;
        visuals.widgets.active.bg_fill = self.accent;
        visuals.selection.bg_fill = self.muted;
        visuals.selection.stroke.color = self.accent;
        visuals.hyperlink_color = self.accent;
        visuals
    }

    fn light_visuals(&self) -> egui::Visuals {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = egui::Color32::from_gray(245);
        visuals.window_fill = egui::Color32::from_gray(250);
        visuals.widgets.hovered.bg_fill = shade(self.accent, 0.4, 0.95);
        visuals.widgets.active.bg_fill = shade(self.accent, 1.0, 0.8);
        visuals.selection.bg_fill = shade(self.accent, 0.5, 0.9);
        visuals.selection.stroke.color = self.accent;
        visuals.hyperlink_color = self.muted;
        visuals
    }
}

impl Default for AccentScheme {
    fn default() -> Self {
        Self::from_accent(egui::Color32::from_rgb(22, 119, 255))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn toggle_persists_across_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let mut store = ThemeStore::load(ClientStorage::open(&path));
        assert_eq!(store.mode(), ThemeMode::Light);
        assert_eq!(store.toggle().unwrap(), ThemeMode::Dark);
        drop(store);

        let mut reloaded = ThemeStore::load(ClientStorage::open(&path));
        assert_eq!(reloaded.mode(), ThemeMode::Dark);
        assert_eq!(reloaded.toggle().unwrap(), ThemeMode::Light);

        let stored = ClientStorage::open(&path);
        assert_eq!(stored.get(THEME_KEY), Some("light"));
    }

    #[test]
    fn unknown_stored_value_means_light() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        ClientStorage::open(&path).set(THEME_KEY, "sepia").unwrap();

        let store = ThemeStore::load(ClientStorage::open(&path));
        assert_eq!(store.mode(), ThemeMode::Light);
    }

    #[test]
    fn visuals_follow_mode() {
        assert!(ThemeMode::Dark.visuals().dark_mode);
        assert!(!ThemeMode::Light.visuals().dark_mode);
    }

    #[test]
    fn hsv_round_trip_for_primary_red() {
        let red = egui::Color32::from_rgb(255, 0, 0);
        let (h, s, v) = rgb_to_hsv(red);
        assert!(h.abs() < 1.0);
        assert!((s - 1.0).abs() < 0.01);
        assert!((v - 1.0).abs() < 0.01);
        assert_eq!(hsv_to_rgb(h, s, v), red);
    }
}
