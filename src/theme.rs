//! Light and dark palettes for the UI.
//!
//! The active palette follows the persisted dark-mode preference and can be
//! swapped at runtime. Individual colors can be overridden from an optional
//! `theme.conf` next to the config file, in `key #RRGGBB` format.

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;

use crate::config::AppConfig;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,       // Active borders, highlights
    pub danger: Color,       // Validation errors, alerts
    pub success: Color,      // Accepted input, copy confirmation
    pub warning: Color,      // Status messages
    pub text: Color,         // Primary text
    pub text_dim: Color,     // Hints, placeholder text
    pub bg_selected: Color,  // Selected card background
    pub inactive: Color,     // Inactive borders
    pub header: Color,       // Card titles
}

impl Theme {
    /// Built-in dark palette (Catppuccin-inspired)
    pub fn dark() -> Self {
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(249, 226, 175),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(137, 180, 250),
        }
    }

    /// Built-in light palette
    pub fn light() -> Self {
        Self {
            accent: Color::Rgb(230, 100, 30),
            danger: Color::Rgb(210, 15, 57),
            success: Color::Rgb(64, 160, 43),
            warning: Color::Rgb(223, 142, 29),
            text: Color::Rgb(46, 52, 64),
            text_dim: Color::Rgb(124, 127, 147),
            bg_selected: Color::Rgb(204, 208, 218),
            inactive: Color::Rgb(156, 160, 176),
            header: Color::Rgb(30, 102, 245),
        }
    }

    /// Palette for the given mode, with any `theme.conf` overrides applied
    pub fn load(dark_mode: bool) -> Self {
        let mut theme = if dark_mode { Self::dark() } else { Self::light() };

        if let Some(path) = AppConfig::theme_path() {
            if let Ok(content) = fs::read_to_string(&path) {
                theme.apply_overrides(&Self::parse_theme_conf(&content));
            }
        }

        theme
    }

    fn apply_overrides(&mut self, colors: &HashMap<String, Color>) {
        let slots: [(&str, &mut Color); 9] = [
            ("accent", &mut self.accent),
            ("danger", &mut self.danger),
            ("success", &mut self.success),
            ("warning", &mut self.warning),
            ("text", &mut self.text),
            ("text_dim", &mut self.text_dim),
            ("bg_selected", &mut self.bg_selected),
            ("inactive", &mut self.inactive),
            ("header", &mut self.header),
        ];
        for (key, slot) in slots {
            if let Some(color) = colors.get(key) {
                *slot = *color;
            }
        }
    }

    /// Parse `key #hexcolor` lines; comments and unknown values are skipped
    fn parse_theme_conf(content: &str) -> HashMap<String, Color> {
        let mut colors = HashMap::new();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.splitn(2, char::is_whitespace).collect();
            if parts.len() == 2 {
                if let Some(color) = Self::parse_hex_color(parts[1].trim()) {
                    colors.insert(parts[0].trim().to_string(), color);
                }
            }
        }

        colors
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#ffc107"), Some(Color::Rgb(255, 193, 7)));
        assert_eq!(Theme::parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("#zzz"), None);
        assert_eq!(Theme::parse_hex_color("#12345"), None);
    }

    #[test]
    fn test_overrides_only_touch_named_keys() {
        let conf = "# palette tweaks\naccent #ff0000\nbogus #00ff00\n";
        let colors = Theme::parse_theme_conf(conf);

        let mut theme = Theme::dark();
        let danger_before = theme.danger;
        theme.apply_overrides(&colors);

        assert_eq!(theme.accent, Color::Rgb(255, 0, 0));
        assert_eq!(theme.danger, danger_before);
    }
}
