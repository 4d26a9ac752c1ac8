//! Theme styling module for the TUI UI layer.
//!
//! This module defines the color palettes, semantic theme roles, and helper
//! builders for Ratatui widgets and styles. Prefer these helpers over
//! hard-coding colors to keep the UI consistent.

use std::env;

use tracing::debug;

pub mod palettes;
pub mod roles;
pub mod theme_helpers;

pub use palettes::{Ansi256Theme, DraculaTheme, NordTheme};
pub use roles::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Selects a theme based on the environment, the requested name and terminal capabilities.
///
/// Resolution order: `TUI_THEME`, then `requested` (CLI flag, then saved
/// preference as supplied by the caller), then Dracula. ANSI-only terminals
/// always get the indexed fallback palette.
pub fn load(requested: Option<&str>) -> Box<dyn Theme> {
    if matches!(detect_color_capability(), ColorCapability::Ansi256) {
        debug!("ANSI-only terminal detected; ignoring theme overrides and forcing fallback palette.");
        return Box::new(Ansi256Theme::new());
    }

    let from_env = env::var("TUI_THEME").ok();
    let theme = from_env
        .as_deref()
        .into_iter()
        .chain(requested)
        .find_map(resolve)
        .unwrap_or_else(|| Box::new(DraculaTheme::new()));
    debug!(theme = theme.id(), "theme selected");
    theme
}

/// Build the palette registered under `name` (case-insensitive).
pub fn resolve(name: &str) -> Option<Box<dyn Theme>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "dracula" => Some(Box::new(DraculaTheme::new())),
        "nord" => Some(Box::new(NordTheme::new())),
        "ansi256" | "ansi" => Some(Box::new(Ansi256Theme::new())),
        _ => None,
    }
}

fn detect_color_capability() -> ColorCapability {
    if let Some(mode) = env::var("TUI_COLOR_MODE").ok().and_then(|value| parse_color_mode(value.trim())) {
        return mode;
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("truecolor") || term.contains("direct") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

fn parse_color_mode(value: &str) -> Option<ColorCapability> {
    match value.to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorCapability::Truecolor),
        "ansi256" | "256" | "8bit" => Some(ColorCapability::Ansi256),
        _ => None,
    }
}
