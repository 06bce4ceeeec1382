use std::fs;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_dim: String,
    pub highlight: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

struct Palette {
    name: &'static str,
    colors: [&'static str; 14],
}

// Field order matches `ThemeColors`.
const BUILT_IN: &[Palette] = &[
    Palette {
        name: "catppuccin-mocha",
        colors: [
            "#1e1e2e", "#cdd6f4", "#585b70", "#f9e2af", "#89b4fa", "#45475a", "#45475a",
            "#313244", "#cdd6f4", "#89b4fa", "#313244", "#f38ba8", "#f9e2af", "#a6e3a1",
        ],
    },
    Palette {
        name: "gruvbox-dark",
        colors: [
            "#282828", "#ebdbb2", "#7c6f64", "#fabd2f", "#83a598", "#504945", "#504945",
            "#3c3836", "#ebdbb2", "#83a598", "#3c3836", "#fb4934", "#fabd2f", "#b8bb26",
        ],
    },
    Palette {
        name: "solarized-light",
        colors: [
            "#fdf6e3", "#657b83", "#93a1a1", "#b58900", "#268bd2", "#eee8d5", "#93a1a1",
            "#eee8d5", "#586e75", "#268bd2", "#eee8d5", "#dc322f", "#cb4b16", "#859900",
        ],
    },
];

impl Theme {
    /// User themes in `<config_dir>/mathdr/themes/<name>.toml` shadow the
    /// built-in palettes of the same name.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("mathdr")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(e) => {
                        tracing::warn!(path = %user_theme_path.display(), error = %e, "ignoring broken theme file");
                    }
                }
            }
        }

        Self::built_in(name)
    }

    pub fn built_in(name: &str) -> Option<Self> {
        BUILT_IN
            .iter()
            .find(|palette| palette.name == name)
            .map(|palette| Self {
                name: palette.name.to_string(),
                colors: ThemeColors::from_palette(&palette.colors),
            })
    }

    pub fn available_themes() -> Vec<&'static str> {
        BUILT_IN.iter().map(|palette| palette.name).collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::from_palette(&BUILT_IN[0].colors)
    }
}

impl ThemeColors {
    fn from_palette(c: &[&str; 14]) -> Self {
        Self {
            bg: c[0].to_string(),
            fg: c[1].to_string(),
            text_dim: c[2].to_string(),
            highlight: c[3].to_string(),
            accent: c[4].to_string(),
            accent_dim: c[5].to_string(),
            border: c[6].to_string(),
            header_bg: c[7].to_string(),
            header_fg: c[8].to_string(),
            bar_filled: c[9].to_string(),
            bar_empty: c[10].to_string(),
            error: c[11].to_string(),
            warning: c[12].to_string(),
            success: c[13].to_string(),
        }
    }

    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_dim(&self) -> Color { Self::parse_color(&self.text_dim) }
    pub fn highlight(&self) -> Color { Self::parse_color(&self.highlight) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_palettes_load() {
        for name in Theme::available_themes() {
            let theme = Theme::built_in(name).unwrap();
            assert_eq!(theme.name, name);
            assert!(matches!(theme.colors.bg(), Color::Rgb(..)));
        }
        assert!(Theme::built_in("no-such-theme").is_none());
    }

    #[test]
    fn test_parse_color_falls_back_to_white() {
        assert_eq!(ThemeColors::parse_color("#ff0080"), Color::Rgb(255, 0, 128));
        assert_eq!(ThemeColors::parse_color("ff0080"), Color::Rgb(255, 0, 128));
        assert_eq!(ThemeColors::parse_color("#fff"), Color::White);
        assert_eq!(ThemeColors::parse_color("#zzzzzz"), Color::White);
    }

    #[test]
    fn test_theme_toml_shape() {
        let theme = Theme::default();
        let text = toml::to_string(&theme).unwrap();
        let parsed: Theme = toml::from_str(&text).unwrap();
        assert_eq!(parsed.colors.accent, theme.colors.accent);
    }
}
