use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Style for table header cells: secondary text, bold.
pub fn table_header_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.text_secondary_style().add_modifier(Modifier::BOLD)
}

/// Background style for the entire header row to avoid gaps between columns.
pub fn table_header_row_style<T: Theme + ?Sized>(theme: &T) -> Style {
    Style::default()
        .bg(theme.roles().surface_muted)
        .fg(theme.roles().text_secondary)
}

/// Darken an RGB color by a multiplicative factor (0.0..=1.0).
/// If the color is not RGB, returns it unchanged.
fn darken_rgb(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let f = factor.clamp(0.0, 1.0);
            let scale = |channel: u8| (channel as f32 * f).round().clamp(0.0, 255.0) as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        other => other,
    }
}

/// Zebra-striped row style; odd rows sit on a slightly recessed surface.
pub fn table_row_style<T: Theme + ?Sized>(theme: &T, row_index: usize) -> Style {
    let ThemeRoles {
        surface,
        surface_muted,
        text,
        ..
    } = *theme.roles();
    let background = if row_index % 2 == 0 { surface } else { darken_rgb(surface_muted, 0.60) };
    Style::default().bg(background).fg(text)
}

/// Filled accent style for the primary call to action; muted when disabled.
pub fn button_primary_style<T: Theme + ?Sized>(theme: &T, enabled: bool) -> Style {
    let ThemeRoles {
        accent_primary,
        surface,
        surface_muted,
        text_muted,
        ..
    } = *theme.roles();
    if enabled {
        Style::default().bg(accent_primary).fg(surface).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(surface_muted).fg(text_muted)
    }
}

/// Outline-like style for secondary buttons.
pub fn button_secondary_style<T: Theme + ?Sized>(theme: &T, enabled: bool, selected: bool) -> Style {
    if !enabled {
        return theme.text_muted_style();
    }
    let style = Style::default().fg(theme.roles().accent_secondary);
    if selected { style.bg(theme.roles().selection_bg) } else { style }
}

/// Visual variant of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Primary,
    Secondary,
}

/// Renders a bordered, centered button.
pub fn render_button<T: Theme + ?Sized>(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    kind: ButtonKind,
    is_enabled: bool,
    is_focused: bool,
    theme: &T,
) {
    let border_style = if is_enabled {
        theme.border_style(is_focused)
    } else {
        theme.text_muted_style()
    };

    let button_style = match kind {
        ButtonKind::Primary => button_primary_style(theme, is_enabled),
        ButtonKind::Secondary => button_secondary_style(theme, is_enabled, is_focused),
    };

    frame.render_widget(
        Paragraph::new(label)
            .centered()
            .block(Block::bordered().border_style(border_style))
            .style(button_style),
        area,
    );
}
