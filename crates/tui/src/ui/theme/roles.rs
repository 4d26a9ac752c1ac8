use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Semantic color roles the viewer draws with.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    /// Panel and table background.
    pub surface: Color,
    /// Header rows, zebra stripes and disabled buttons.
    pub surface_muted: Color,
    pub border: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    /// Primary call to action (find learner) and checked boxes.
    pub accent_primary: Color,
    pub accent_secondary: Color,

    pub info: Color,
    pub error: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
    pub focus: Color,
}

/// Palette plus the style builders shared by every component.
pub trait Theme: Send + Sync + Debug {
    /// Canonical identifier, as accepted by `--theme` and `TUI_THEME`.
    fn id(&self) -> &'static str;

    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }

    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }

    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let roles = self.roles();
        Style::default().fg(if focused { roles.focus } else { roles.border })
    }

    /// Highlighted table row.
    fn selection_style(&self) -> Style {
        let roles = self.roles();
        Style::default().fg(roles.selection_fg).bg(roles.selection_bg)
    }

    fn status_info(&self) -> Style {
        Style::default().fg(self.roles().info)
    }

    fn status_error(&self) -> Style {
        Style::default().fg(self.roles().error)
    }

    fn accent_emphasis_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary).add_modifier(Modifier::BOLD)
    }

    /// Marker cell of a learner row: checked, locked by another selection, or open.
    fn checkbox_style(&self, checked: bool, locked: bool) -> Style {
        match (checked, locked) {
            (true, _) => self.accent_emphasis_style(),
            (false, true) => self.text_muted_style().add_modifier(Modifier::DIM),
            (false, false) => self.text_secondary_style(),
        }
    }
}
