use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;

use crate::io::storage::{KeyValueStore, StorageError};
use crate::model::UiConfig;
use crate::ops::countdown;

/// Storage key for the chosen theme
pub const THEME_KEY: &str = "theme";

/// Light or dark palette, persisted under `theme`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// The stored mode, else `fallback`. Unknown stored values are ignored.
    pub fn load<S: KeyValueStore>(storage: &S, fallback: ThemeMode) -> ThemeMode {
        match storage.get(THEME_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or(fallback),
            _ => fallback,
        }
    }

    pub fn save<S: KeyValueStore>(self, storage: &mut S) -> Result<(), StorageError> {
        storage.set(THEME_KEY, self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(format!("unknown theme '{}' (expected: light, dark)", s)),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            mode: ThemeMode::Dark,
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
        }
    }

    pub fn light() -> Self {
        Theme {
            mode: ThemeMode::Light,
            background: Color::Rgb(0xFA, 0xF8, 0xF5),
            text: Color::Rgb(0x3A, 0x36, 0x5C),
            text_bright: Color::Rgb(0x0C, 0x00, 0x1B),
            highlight: Color::Rgb(0xC2, 0x18, 0x5B),
            dim: Color::Rgb(0x8A, 0x86, 0xA8),
            red: Color::Rgb(0xC6, 0x28, 0x28),
            yellow: Color::Rgb(0xB2, 0x8A, 0x00),
            green: Color::Rgb(0x2E, 0x7D, 0x32),
            cyan: Color::Rgb(0x00, 0x83, 0x8F),
            selection_bg: Color::Rgb(0xF3, 0xD9, 0xE6),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
        }
    }

    /// The palette for `mode` with `[ui.colors]` overrides applied
    pub fn from_config(mode: ThemeMode, ui: &UiConfig) -> Self {
        let mut theme = match mode {
            ThemeMode::Light => Theme::light(),
            ThemeMode::Dark => Theme::dark(),
        };

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "yellow" => theme.yellow = color,
                    "green" => theme.green = color,
                    "cyan" => theme.cyan = color,
                    "selection_bg" => theme.selection_bg = color,
                    "search_match_bg" => theme.search_match_bg = color,
                    "search_match_fg" => theme.search_match_fg = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Color for a countdown string
    pub fn countdown_color(&self, text: &str) -> Color {
        match text {
            countdown::EXPIRED => self.red,
            countdown::INVALID => self.yellow,
            _ => self.cyan,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStore;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb(0xFF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None);
    }

    #[test]
    fn test_from_config_overrides_either_palette() {
        let mut ui = UiConfig::default();
        ui.colors.insert("highlight".into(), "#112233".into());
        ui.colors.insert("nonsense".into(), "#000000".into());

        let light = Theme::from_config(ThemeMode::Light, &ui);
        assert_eq!(light.mode, ThemeMode::Light);
        assert_eq!(light.highlight, Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(light.background, Theme::light().background);

        let dark = Theme::from_config(ThemeMode::Dark, &ui);
        assert_eq!(dark.highlight, Color::Rgb(0x11, 0x22, 0x33));
    }

    #[test]
    fn test_mode_persistence() {
        let mut storage = MemoryStore::default();
        assert_eq!(ThemeMode::load(&storage, ThemeMode::Dark), ThemeMode::Dark);

        ThemeMode::Light.save(&mut storage).unwrap();
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(ThemeMode::load(&storage, ThemeMode::Dark), ThemeMode::Light);

        storage.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(ThemeMode::load(&storage, ThemeMode::Dark), ThemeMode::Dark);
    }

    #[test]
    fn test_toggle_and_parse() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!("LIGHT".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("blue".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn test_countdown_color() {
        let theme = Theme::dark();
        assert_eq!(theme.countdown_color("Expired"), theme.red);
        assert_eq!(theme.countdown_color("Invalid date"), theme.yellow);
        assert_eq!(theme.countdown_color("5s left"), theme.cyan);
    }
}
