//! Color themes
//!
//! Static palettes for the six selectable themes. `auto` follows the
//! system color scheme.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Auto,
    Nature,
    Ocean,
    Sunset,
}

/// Color scheme reported by the host system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Light,
        Theme::Dark,
        Theme::Auto,
        Theme::Nature,
        Theme::Ocean,
        Theme::Sunset,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
            Theme::Nature => "nature",
            Theme::Ocean => "ocean",
            Theme::Sunset => "sunset",
        }
    }

    /// Parse a stored theme name; unknown names fall back to light
    pub fn from_setting(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "dark" => Theme::Dark,
            "auto" => Theme::Auto,
            "nature" => Theme::Nature,
            "ocean" => Theme::Ocean,
            "sunset" => Theme::Sunset,
            _ => Theme::Light,
        }
    }

    /// Concrete theme after applying the system scheme to `auto`
    pub fn resolve(self, system: ColorScheme) -> Theme {
        match (self, system) {
            (Theme::Auto, ColorScheme::Dark) => Theme::Dark,
            (Theme::Auto, ColorScheme::Light) => Theme::Light,
            (theme, _) => theme,
        }
    }

    pub fn is_dark(self, system: ColorScheme) -> bool {
        self.resolve(system) == Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colors for one theme; `mood[0]` is mood 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub primary_foreground: &'static str,
    pub secondary: &'static str,
    pub secondary_foreground: &'static str,
    pub accent: &'static str,
    pub accent_foreground: &'static str,
    pub background: &'static str,
    pub foreground: &'static str,
    pub card: &'static str,
    pub card_foreground: &'static str,
    pub muted: &'static str,
    pub muted_foreground: &'static str,
    pub border: &'static str,
    pub mood: [&'static str; 5],
}

impl Palette {
    /// Color for a mood rating, if it is in range
    pub fn mood_color(&self, mood: i64) -> Option<&'static str> {
        usize::try_from(mood - 1)
            .ok()
            .and_then(|i| self.mood.get(i).copied())
    }
}

const LIGHT: Palette = Palette {
    primary: "#3b82f6",
    primary_foreground: "#ffffff",
    secondary: "#e5e7eb",
    secondary_foreground: "#1f2937",
    accent: "#8b5cf6",
    accent_foreground: "#ffffff",
    background: "#ffffff",
    foreground: "#111827",
    card: "#ffffff",
    card_foreground: "#1f2937",
    muted: "#f9fafb",
    muted_foreground: "#6b7280",
    border: "#e5e7eb",
    mood: ["#ef4444", "#fb923c", "#eab308", "#22c55e", "#10b981"],
};

const DARK: Palette = Palette {
    primary: "#3b82f6",
    primary_foreground: "#ffffff",
    secondary: "#374151",
    secondary_foreground: "#e5e7eb",
    accent: "#8b5cf6",
    accent_foreground: "#ffffff",
    background: "#111827",
    foreground: "#f3f4f6",
    card: "#1f2937",
    card_foreground: "#e5e7eb",
    muted: "#374151",
    muted_foreground: "#9ca3af",
    border: "#4b5563",
    mood: ["#dc2626", "#ea580c", "#ca8a04", "#16a34a", "#059669"],
};

const NATURE: Palette = Palette {
    primary: "#22c55e",
    primary_foreground: "#ffffff",
    secondary: "#dcfce7",
    secondary_foreground: "#14532d",
    accent: "#84cc16",
    accent_foreground: "#ffffff",
    background: "#f7fee7",
    foreground: "#14532d",
    card: "#ffffff",
    card_foreground: "#166534",
    muted: "#ecfdf5",
    muted_foreground: "#65a30d",
    border: "#bbf7d0",
    mood: ["#b91c1c", "#c2410c", "#a16207", "#15803d", "#065f46"],
};

const OCEAN: Palette = Palette {
    primary: "#0ea5e9",
    primary_foreground: "#ffffff",
    secondary: "#e0f2fe",
    secondary_foreground: "#0c4a6e",
    accent: "#06b6d4",
    accent_foreground: "#ffffff",
    background: "#f0f9ff",
    foreground: "#0c4a6e",
    card: "#ffffff",
    card_foreground: "#075985",
    muted: "#ecfeff",
    muted_foreground: "#0891b2",
    border: "#bae6fd",
    mood: ["#be185d", "#c2410c", "#b45309", "#155e75", "#0c4a6e"],
};

const SUNSET: Palette = Palette {
    primary: "#fb923c",
    primary_foreground: "#ffffff",
    secondary: "#fef08a",
    secondary_foreground: "#78350f",
    accent: "#f43f5e",
    accent_foreground: "#ffffff",
    background: "#fffbeb",
    foreground: "#78350f",
    card: "#ffffff",
    card_foreground: "#9a3412",
    muted: "#fef3c7",
    muted_foreground: "#d97706",
    border: "#fed7aa",
    mood: ["#be185d", "#c2410c", "#b45309", "#d97706", "#fbbf24"],
};

/// Palette for a theme under the given system scheme
pub fn palette(theme: Theme, system: ColorScheme) -> &'static Palette {
    match theme.resolve(system) {
        Theme::Dark => &DARK,
        Theme::Nature => &NATURE,
        Theme::Ocean => &OCEAN,
        Theme::Sunset => &SUNSET,
        Theme::Light | Theme::Auto => &LIGHT,
    }
}
