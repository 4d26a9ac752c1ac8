use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use peerwait_types::{Effect, LoadState};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::components::waiting_step_list::WaitingStepListComponent;
use crate::ui::labels;
use crate::ui::theme::theme_helpers;

static FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Container that shows the throbber, the error banner, or the step summary
/// above the learner table, depending on the loader state.
#[derive(Debug, Default)]
pub struct DetailsLoaderComponent {
    list: WaitingStepListComponent,
}

impl DetailsLoaderComponent {
    fn render_loading(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.theme;
        let frame_symbol = FRAMES[app.throbber_idx % FRAMES.len()];
        let line = Line::from(vec![
            Span::styled(frame_symbol, theme.accent_emphasis_style()),
            Span::raw(" "),
            Span::styled(app.t(labels::LOADING), theme.text_secondary_style()),
        ]);
        let block = theme_helpers::block(theme, None, false);
        frame.render_widget(Paragraph::new(line).centered().block(block), area);
    }

    fn render_error(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.theme;
        let lines = vec![
            Line::from(Span::styled(
                app.t(labels::FETCH_ERROR),
                theme.status_error().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(app.t(labels::RETRY_HINT), theme.text_muted_style())),
        ];
        let [banner_area, _] = Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);
        let block = theme_helpers::block(theme, None, false).border_style(theme.status_error());
        frame.render_widget(Paragraph::new(lines).block(block), banner_area);
    }

    fn render_summary(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.theme;
        let details = app.loader.details();
        let line = Line::from(vec![
            Span::styled(format!("{}: ", app.t(labels::MUST_GRADE)), theme.text_secondary_style()),
            Span::styled(details.must_grade.to_string(), theme.text_primary_style()),
            Span::raw("   "),
            Span::styled(
                format!("{}: ", app.t(labels::MUST_BE_GRADED_BY)),
                theme.text_secondary_style(),
            ),
            Span::styled(details.must_be_graded_by.to_string(), theme.text_primary_style()),
        ]);
        let block = theme_helpers::block(theme, Some(details.display_name.as_str()), false);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

impl Component for DetailsLoaderComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match app.loader.load_state() {
            LoadState::Ready => self.list.handle_key_events(app, key),
            LoadState::Error if key.code == KeyCode::Char('r') => vec![Effect::RefreshRequested],
            LoadState::Error | LoadState::Loading => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if app.loader.load_state() == LoadState::Ready {
            self.list.handle_mouse_events(app, mouse)
        } else {
            Vec::new()
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        match app.loader.load_state() {
            LoadState::Loading => Self::render_loading(frame, area, app),
            LoadState::Error => Self::render_error(frame, area, app),
            LoadState::Ready => {
                let [summary_area, list_area] =
                    Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
                Self::render_summary(frame, summary_area, app);
                self.list.render(frame, list_area, app);
            }
        }
    }
}
