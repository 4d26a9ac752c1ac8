//! Built-in palettes: Dracula (default), Nord, and an ANSI 256-color
//! fallback for terminals without truecolor support.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

/// Dracula palette (https://draculatheme.com/contribute), tuned for dark terminals.
#[derive(Debug, Clone)]
pub struct DraculaTheme {
    roles: ThemeRoles,
}

impl DraculaTheme {
    pub fn new() -> Self {
        const BG: Color = Color::Rgb(0x28, 0x2A, 0x36);
        const CURRENT_LINE: Color = Color::Rgb(0x44, 0x47, 0x5A);
        const FOREGROUND: Color = Color::Rgb(0xF8, 0xF8, 0xF2);
        const COMMENT: Color = Color::Rgb(0x62, 0x72, 0xA4);
        const CYAN: Color = Color::Rgb(0x8B, 0xE9, 0xFD);
        const PINK: Color = Color::Rgb(0xFF, 0x79, 0xC6);
        const RED: Color = Color::Rgb(0xFF, 0x55, 0x55);

        Self {
            roles: ThemeRoles {
                surface: BG,
                surface_muted: CURRENT_LINE,
                border: CURRENT_LINE,
                text: FOREGROUND,
                text_secondary: COMMENT,
                text_muted: COMMENT,
                accent_primary: PINK,
                accent_secondary: CYAN,
                info: CYAN,
                error: RED,
                selection_bg: CURRENT_LINE,
                selection_fg: FOREGROUND,
                focus: CYAN,
            },
        }
    }
}

impl Theme for DraculaTheme {
    fn id(&self) -> &'static str {
        "dracula"
    }

    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

/// Calm polar blues with aurora accents (https://www.nordtheme.com).
#[derive(Debug, Clone)]
pub struct NordTheme {
    roles: ThemeRoles,
}

impl NordTheme {
    pub fn new() -> Self {
        const POLAR_NIGHT_0: Color = Color::Rgb(0x2E, 0x34, 0x40);
        const POLAR_NIGHT_2: Color = Color::Rgb(0x43, 0x4C, 0x5E);
        const POLAR_NIGHT_3: Color = Color::Rgb(0x4C, 0x56, 0x6A);
        const SNOW_STORM_0: Color = Color::Rgb(0xD8, 0xDE, 0xE9);
        const SNOW_STORM_2: Color = Color::Rgb(0xEC, 0xEF, 0xF4);
        const FROST_1: Color = Color::Rgb(0x88, 0xC0, 0xD0);
        const FROST_3: Color = Color::Rgb(0x5E, 0x81, 0xAC);
        const AURORA_RED: Color = Color::Rgb(0xBF, 0x61, 0x6A);
        const MUTED: Color = Color::Rgb(0x7B, 0x88, 0xA1);

        Self {
            roles: ThemeRoles {
                surface: POLAR_NIGHT_0,
                surface_muted: POLAR_NIGHT_2,
                border: POLAR_NIGHT_3,
                text: SNOW_STORM_2,
                text_secondary: SNOW_STORM_0,
                text_muted: MUTED,
                accent_primary: FROST_1,
                accent_secondary: FROST_3,
                info: FROST_1,
                error: AURORA_RED,
                selection_bg: FROST_3,
                selection_fg: SNOW_STORM_2,
                focus: FROST_1,
            },
        }
    }
}

impl Theme for NordTheme {
    fn id(&self) -> &'static str {
        "nord"
    }

    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

/// ANSI 256-color approximation of the Dracula palette.
#[derive(Debug, Clone)]
pub struct Ansi256Theme {
    roles: ThemeRoles,
}

impl Ansi256Theme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                surface: Color::Indexed(236),
                surface_muted: Color::Indexed(239),
                border: Color::Indexed(239),
                text: Color::Indexed(255),
                text_secondary: Color::Indexed(250),
                text_muted: Color::Indexed(247),
                accent_primary: Color::Indexed(212),
                accent_secondary: Color::Indexed(117),
                info: Color::Indexed(117),
                error: Color::Indexed(203),
                selection_bg: Color::Indexed(239),
                selection_fg: Color::Indexed(255),
                focus: Color::Indexed(117),
            },
        }
    }
}

impl Theme for Ansi256Theme {
    fn id(&self) -> &'static str {
        "ansi256"
    }

    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
