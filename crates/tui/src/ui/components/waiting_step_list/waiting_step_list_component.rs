use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use peerwait_types::{Effect, FindAction, StudentRow};
use peerwait_util::readable_time_since;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::Span,
    widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table},
};
use tracing::debug;

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::labels;
use crate::ui::theme::theme_helpers::{self, ButtonKind, render_button};

/// Automation identifier of the find learner action.
pub const FIND_LEARNER_BUTTON_ID: &str = "find-learner-button";
pub const REFRESH_BUTTON_ID: &str = "refresh-button";

const CHECKBOX_EMPTY: &str = "☐";
const CHECKBOX_CHECKED: &str = "☑";
const CHECKBOX_LOCKED: &str = "⊘";

const HIGHLIGHT_SYMBOL: &str = "> ";
const HIGHLIGHT_WIDTH: u16 = 2;
const SELECTION_COLUMN_WIDTH: u16 = 3;
const REFRESH_BUTTON_WIDTH: u16 = 13;
const FIND_BUTTON_WIDTH: u16 = 20;

/// Clickable regions recorded during the last render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitingStepListHitArea {
    /// Select-all marker in the selection column header.
    HeaderCheckbox(Rect),
    /// Checkbox cell of the row at the given index.
    RowCheckbox(usize, Rect),
    /// Whole row at the given index.
    Row(usize, Rect),
    RefreshButton(Rect),
    /// Find learner action and whether it is enabled.
    FindLearnerButton(Rect, bool),
}

impl WaitingStepListHitArea {
    pub fn rect(&self) -> Rect {
        match self {
            Self::HeaderCheckbox(rect)
            | Self::RowCheckbox(_, rect)
            | Self::Row(_, rect)
            | Self::RefreshButton(rect)
            | Self::FindLearnerButton(rect, _) => *rect,
        }
    }

    /// Stable identifier for UI automation, when the region has one.
    pub fn automation_id(&self) -> Option<&'static str> {
        match self {
            Self::FindLearnerButton(..) => Some(FIND_LEARNER_BUTTON_ID),
            Self::RefreshButton(_) => Some(REFRESH_BUTTON_ID),
            _ => None,
        }
    }
}

/// Display text for each data column of `row`, in column order.
///
/// The time spent column is derived from `created_at` relative to `now`.
pub fn display_cells(row: &StudentRow, now: DateTime<Utc>) -> [String; 6] {
    [
        row.username.clone(),
        row.graded.to_string(),
        row.graded_by.to_string(),
        readable_time_since(row.created_at.as_datetime(), now),
        row.staff_grade_status.clone(),
        row.workflow_status.clone(),
    ]
}

/// Learner table with an optional selection column and the refresh / find
/// learner actions.
#[derive(Debug, Default)]
pub struct WaitingStepListComponent {
    hit_areas: Vec<WaitingStepListHitArea>,
}

impl WaitingStepListComponent {
    #[cfg(test)]
    pub fn hit_areas(&self) -> &[WaitingStepListHitArea] {
        &self.hit_areas
    }

    #[cfg(test)]
    pub fn find_by_automation_id(&self, id: &str) -> Option<&WaitingStepListHitArea> {
        self.hit_areas.iter().find(|area| area.automation_id() == Some(id))
    }

    fn activate_find(app: &mut App) -> Vec<Effect> {
        app.loader.list.activate_find().into_iter().collect()
    }

    fn activate_refresh(app: &mut App) -> Vec<Effect> {
        vec![app.loader.list.activate_refresh()]
    }

    /// Activate whichever control holds focus; the grid toggles its highlighted row.
    fn activate_focused(app: &mut App, on_grid: impl FnOnce(&mut App) -> Vec<Effect>) -> Vec<Effect> {
        if app.loader.list.f_refresh.get() {
            Self::activate_refresh(app)
        } else if app.loader.list.f_find.get() {
            Self::activate_find(app)
        } else {
            on_grid(app)
        }
    }

    fn column_constraints(selection_enabled: bool) -> Vec<Constraint> {
        let mut constraints = Vec::with_capacity(7);
        if selection_enabled {
            constraints.push(Constraint::Length(SELECTION_COLUMN_WIDTH));
        }
        constraints.extend([
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Fill(3),
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Fill(2),
        ]);
        constraints
    }

    fn create_table_header(app: &App) -> Row<'static> {
        let theme = &*app.theme;
        let list = &app.loader.list;
        let mut cells = Vec::with_capacity(7);
        if list.selection_enabled() {
            // No rows means nothing to select; the marker would be inert.
            let has_marker = list.has_header_checkbox() && !list.rows().is_empty();
            let marker = match (has_marker, list.all_selected()) {
                (false, _) => "",
                (true, true) => CHECKBOX_CHECKED,
                (true, false) => CHECKBOX_EMPTY,
            };
            cells.push(Cell::from(Span::styled(marker, theme_helpers::table_header_style(theme))));
        }
        cells.extend(
            labels::COLUMNS
                .iter()
                .map(|key| Cell::from(Span::styled(app.t(key), theme_helpers::table_header_style(theme)))),
        );
        Row::new(cells).style(theme_helpers::table_header_row_style(theme))
    }

    fn create_table_rows(app: &App) -> Vec<Row<'static>> {
        let theme = &*app.theme;
        let list = &app.loader.list;
        let now = app.now();
        list.rows()
            .iter()
            .enumerate()
            .map(|(index, student)| {
                let mut cells = Vec::with_capacity(7);
                if list.selection_enabled() {
                    let checked = list.is_selected(index);
                    let locked = list.is_locked(index);
                    let marker = match (checked, locked) {
                        (true, _) => CHECKBOX_CHECKED,
                        (false, true) => CHECKBOX_LOCKED,
                        (false, false) => CHECKBOX_EMPTY,
                    };
                    cells.push(Cell::from(Span::styled(marker, theme.checkbox_style(checked, locked))));
                }
                cells.extend(display_cells(student, now).into_iter().map(Cell::from));
                Row::new(cells).style(theme_helpers::table_row_style(theme, index))
            })
            .collect()
    }

    fn render_actions(frame: &mut Frame, area: Rect, app: &App) -> Vec<WaitingStepListHitArea> {
        let theme = &*app.theme;
        let list = &app.loader.list;
        let [refresh_area, _, message_area, find_area] = Layout::horizontal([
            Constraint::Length(REFRESH_BUTTON_WIDTH),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(FIND_BUTTON_WIDTH),
        ])
        .areas(area);

        render_button(
            frame,
            refresh_area,
            &app.t(labels::REFRESH),
            ButtonKind::Secondary,
            true,
            list.f_refresh.get(),
            theme,
        );
        let mut hit_areas = vec![WaitingStepListHitArea::RefreshButton(refresh_area)];

        let find_action = list.find_action();
        if let FindAction::Disabled {
            invalid_selection: true,
        } = find_action
        {
            let message_line = Rect {
                y: message_area.y.saturating_add(1),
                height: message_area.height.min(1),
                ..message_area
            };
            frame.render_widget(
                Paragraph::new(app.t(labels::SELECT_ONE_ROW)).style(theme.status_error()),
                message_line,
            );
        }
        if find_action.is_visible() {
            let enabled = find_action.is_enabled();
            render_button(
                frame,
                find_area,
                &app.t(labels::SEARCH_LEARNER),
                ButtonKind::Primary,
                enabled,
                list.f_find.get(),
                theme,
            );
            hit_areas.push(WaitingStepListHitArea::FindLearnerButton(find_area, enabled));
        }
        hit_areas
    }

    fn render_table(frame: &mut Frame, area: Rect, app: &mut App) -> Vec<WaitingStepListHitArea> {
        let header = Self::create_table_header(app);
        let rows = Self::create_table_rows(app);
        let empty_label = app.t(labels::NO_LEARNERS);

        let theme = &*app.theme;
        let list = &mut app.loader.list;
        let selection_enabled = list.selection_enabled();
        let grid_focused = list.f_grid.get();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(grid_focused))
            .style(theme_helpers::panel_style(theme));
        let inner = block.inner(area);

        let table = Table::new(rows, Self::column_constraints(selection_enabled))
            .header(header)
            .row_highlight_style(theme.selection_style().add_modifier(Modifier::BOLD))
            .highlight_symbol(HIGHLIGHT_SYMBOL)
            .highlight_spacing(HighlightSpacing::Always)
            .block(block);
        frame.render_stateful_widget(table, area, &mut list.table_state);

        let body = Rect {
            y: inner.y.saturating_add(1),
            height: inner.height.saturating_sub(1),
            ..inner
        };
        if list.rows().is_empty() {
            let line = Rect {
                height: body.height.min(1),
                ..body
            };
            frame.render_widget(Paragraph::new(empty_label).style(theme.text_muted_style()), line);
            return Vec::new();
        }

        let checkbox_rect = |y: u16| Rect {
            x: inner.x.saturating_add(HIGHLIGHT_WIDTH),
            y,
            width: SELECTION_COLUMN_WIDTH.min(inner.width.saturating_sub(HIGHLIGHT_WIDTH)),
            height: 1,
        };

        let mut hit_areas = Vec::new();
        if list.has_header_checkbox() && inner.height > 0 {
            hit_areas.push(WaitingStepListHitArea::HeaderCheckbox(checkbox_rect(inner.y)));
        }
        let offset = list.table_state.offset();
        let visible = list.rows().len().saturating_sub(offset).min(body.height as usize);
        let mut row_areas = Vec::with_capacity(visible);
        for position in 0..visible {
            let index = offset + position;
            let y = body.y + position as u16;
            if selection_enabled {
                hit_areas.push(WaitingStepListHitArea::RowCheckbox(index, checkbox_rect(y)));
            }
            row_areas.push(WaitingStepListHitArea::Row(
                index,
                Rect {
                    y,
                    height: 1,
                    ..inner
                },
            ));
        }
        // Checkbox cells sit inside their rows; they must win the hit test.
        hit_areas.extend(row_areas);
        hit_areas
    }

    fn render_status(frame: &mut Frame, area: Rect, app: &App) {
        if let Some(status) = app.status.as_deref() {
            frame.render_widget(Paragraph::new(status.to_string()).style(app.theme.status_info()), area);
        }
    }
}

impl Component for WaitingStepListComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let effects = match key.code {
            KeyCode::Tab => {
                app.focus.next();
                Vec::new()
            }
            KeyCode::BackTab => {
                app.focus.prev();
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.loader.list.move_highlight_up();
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.loader.list.move_highlight_down();
                Vec::new()
            }
            KeyCode::Char(' ') => Self::activate_focused(app, |app| {
                app.loader.list.toggle_highlighted();
                Vec::new()
            }),
            KeyCode::Char('a') if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.loader.list.toggle_all();
                Vec::new()
            }
            KeyCode::Esc => {
                app.loader.list.clear_selection();
                Vec::new()
            }
            KeyCode::Char('r') => Self::activate_refresh(app),
            KeyCode::Char('f') => Self::activate_find(app),
            KeyCode::Enter => Self::activate_focused(app, Self::activate_find),
            _ => Vec::new(),
        };
        app.rebuild_focus();
        effects
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position {
            x: mouse.column,
            y: mouse.row,
        };
        let Some(hit) = self.hit_areas.iter().copied().find(|area| area.rect().contains(position)) else {
            return Vec::new();
        };
        if let Some(control) = hit.automation_id() {
            debug!(control, "clicked");
        }

        let effects = match hit {
            WaitingStepListHitArea::HeaderCheckbox(_) => {
                app.focus.focus(&app.loader.list.f_grid);
                app.loader.list.toggle_all();
                Vec::new()
            }
            WaitingStepListHitArea::RowCheckbox(index, _) => {
                app.focus.focus(&app.loader.list.f_grid);
                app.loader.list.highlight(index);
                app.loader.list.toggle_row(index);
                Vec::new()
            }
            WaitingStepListHitArea::Row(index, _) => {
                app.focus.focus(&app.loader.list.f_grid);
                app.loader.list.highlight(index);
                Vec::new()
            }
            WaitingStepListHitArea::RefreshButton(_) => {
                app.focus.focus(&app.loader.list.f_refresh);
                Self::activate_refresh(app)
            }
            WaitingStepListHitArea::FindLearnerButton(_, enabled) => {
                if enabled {
                    app.focus.focus(&app.loader.list.f_find);
                    Self::activate_find(app)
                } else {
                    Vec::new()
                }
            }
        };
        app.rebuild_focus();
        effects
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let [actions_area, table_area, status_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3), Constraint::Length(1)]).areas(area);

        let mut hit_areas = Self::render_actions(frame, actions_area, app);
        hit_areas.extend(Self::render_table(frame, table_area, app));
        Self::render_status(frame, status_area, app);
        self.hit_areas = hit_areas;
    }
}

#[cfg(test)]
mod tests {
    use peerwait_types::{EmptySelectionPolicy, MultiSelectPolicy, SelectionPolicy};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::test_support::*;
    use crate::ui::components::details_loader::LoaderHooks;
    use crate::ui::components::waiting_step_list::WaitingStepListOptions;

    fn selectable(policy: SelectionPolicy) -> WaitingStepListOptions {
        WaitingStepListOptions {
            selectable_learners_enabled: true,
            selection_policy: policy,
        }
    }

    fn draw(component: &mut WaitingStepListComponent, app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 16)).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                component.render(frame, area, app);
            })
            .expect("draw");
        screen_text(&terminal)
    }

    fn click(component: &mut WaitingStepListComponent, app: &mut App, rect: Rect) -> Vec<Effect> {
        component.handle_mouse_events(
            app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: rect.x,
                row: rect.y,
                modifiers: KeyModifiers::NONE,
            },
        )
    }

    fn press(component: &mut WaitingStepListComponent, app: &mut App, code: KeyCode) -> Vec<Effect> {
        component.handle_key_events(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn row_checkboxes(component: &WaitingStepListComponent) -> Vec<(usize, Rect)> {
        component
            .hit_areas()
            .iter()
            .filter_map(|area| match area {
                WaitingStepListHitArea::RowCheckbox(index, rect) => Some((*index, *rect)),
                _ => None,
            })
            .collect()
    }

    fn header_checkbox(component: &WaitingStepListComponent) -> Option<Rect> {
        component.hit_areas().iter().find_map(|area| match area {
            WaitingStepListHitArea::HeaderCheckbox(rect) => Some(*rect),
            _ => None,
        })
    }

    #[test]
    fn records_one_checkbox_per_row_plus_header() {
        let mut app = loaded_app(
            selectable(SelectionPolicy::default()),
            LoaderHooks::default(),
            ready_response(&["a", "b", "c"]),
        );
        let mut component = WaitingStepListComponent::default();
        draw(&mut component, &mut app);

        let indices: Vec<_> = row_checkboxes(&component).into_iter().map(|(index, _)| index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(header_checkbox(&component).is_some());
    }

    #[test]
    fn selection_disabled_has_no_checkboxes_or_find_action() {
        let mut app = loaded_app(
            WaitingStepListOptions::default(),
            LoaderHooks::default(),
            ready_response(&["a", "b"]),
        );
        let mut component = WaitingStepListComponent::default();
        let text = draw(&mut component, &mut app);

        assert!(row_checkboxes(&component).is_empty());
        assert!(header_checkbox(&component).is_none());
        assert!(component.find_by_automation_id(FIND_LEARNER_BUTTON_ID).is_none());
        assert!(component.find_by_automation_id(REFRESH_BUTTON_ID).is_some());
        assert!(!text.contains(CHECKBOX_EMPTY));
        assert!(text.contains("Username"));
    }

    #[test]
    fn clicking_checkbox_then_find_emits_lookup_once() {
        let mut app = loaded_app(
            selectable(SelectionPolicy::default()),
            LoaderHooks::default(),
            ready_response(&["myusername"]),
        );
        let mut component = WaitingStepListComponent::default();
        draw(&mut component, &mut app);
        assert!(component.find_by_automation_id(FIND_LEARNER_BUTTON_ID).is_none());

        let (_, checkbox) = row_checkboxes(&component)[0];
        assert!(click(&mut component, &mut app, checkbox).is_empty());
        let text = draw(&mut component, &mut app);
        assert!(text.contains(CHECKBOX_CHECKED));
        assert!(text.contains("Search learner"));

        let find = *component.find_by_automation_id(FIND_LEARNER_BUTTON_ID).expect("find button");
        assert_eq!(find, WaitingStepListHitArea::FindLearnerButton(find.rect(), true));
        let effects = click(&mut component, &mut app, find.rect());
        assert_eq!(effects, vec![Effect::FindLearner("myusername".into())]);
    }

    #[test]
    fn two_selected_rows_show_message_and_do_nothing() {
        let mut app = loaded_app(
            selectable(SelectionPolicy::default()),
            LoaderHooks::default(),
            ready_response(&["myusername", "timmy_turner"]),
        );
        let mut component = WaitingStepListComponent::default();
        draw(&mut component, &mut app);
        for (_, rect) in row_checkboxes(&component) {
            click(&mut component, &mut app, rect);
        }
        let text = draw(&mut component, &mut app);
        assert!(text.contains("You must select one row"));

        let find = *component.find_by_automation_id(FIND_LEARNER_BUTTON_ID).expect("find button");
        assert_eq!(find, WaitingStepListHitArea::FindLearnerButton(find.rect(), false));
        assert!(click(&mut component, &mut app, find.rect()).is_empty());
        assert!(press(&mut component, &mut app, KeyCode::Char('f')).is_empty());
    }

    #[test]
    fn disable_when_empty_shows_inert_action_without_message() {
        let policy = SelectionPolicy {
            empty: EmptySelectionPolicy::DisableWhenEmpty,
            ..SelectionPolicy::default()
        };
        let mut app = loaded_app(selectable(policy), LoaderHooks::default(), ready_response(&["a"]));
        let mut component = WaitingStepListComponent::default();
        let text = draw(&mut component, &mut app);

        let find = *component.find_by_automation_id(FIND_LEARNER_BUTTON_ID).expect("find button");
        assert_eq!(find, WaitingStepListHitArea::FindLearnerButton(find.rect(), false));
        assert!(!text.contains("You must select one row"));
    }

    #[test]
    fn lock_policy_renders_locked_rows_and_no_header_marker() {
        let policy = SelectionPolicy {
            multi: MultiSelectPolicy::LockOthersOnSelect,
            ..SelectionPolicy::default()
        };
        let mut app = loaded_app(selectable(policy), LoaderHooks::default(), ready_response(&["a", "b"]));
        let mut component = WaitingStepListComponent::default();
        draw(&mut component, &mut app);
        assert!(header_checkbox(&component).is_none());

        let checkboxes = row_checkboxes(&component);
        click(&mut component, &mut app, checkboxes[0].1);
        click(&mut component, &mut app, checkboxes[1].1);
        let text = draw(&mut component, &mut app);
        assert!(text.contains(CHECKBOX_LOCKED));
        assert_eq!(app.loader.list.selected_usernames(), vec!["a"]);
    }

    #[test]
    fn header_marker_toggles_every_row() {
        let mut app = loaded_app(
            selectable(SelectionPolicy::default()),
            LoaderHooks::default(),
            ready_response(&["a", "b"]),
        );
        let mut component = WaitingStepListComponent::default();
        draw(&mut component, &mut app);
        let header = header_checkbox(&component).expect("header checkbox");
        click(&mut component, &mut app, header);
        assert!(app.loader.list.all_selected());
    }

    #[test]
    fn renders_relative_time_and_empty_notice() {
        let mut app = loaded_app(
            WaitingStepListOptions::default(),
            LoaderHooks::default(),
            ready_response(&["a"]),
        );
        let mut component = WaitingStepListComponent::default();
        assert!(draw(&mut component, &mut app).contains("3 days"));

        let mut app = loaded_app(
            selectable(SelectionPolicy::default()),
            LoaderHooks::default(),
            ready_response(&[]),
        );
        let text = draw(&mut component, &mut app);
        assert!(text.contains("No learners are waiting"));
        assert!(row_checkboxes(&component).is_empty());
    }

    #[test]
    fn empty_list_draws_no_header_marker() {
        let mut app = loaded_app(
            selectable(SelectionPolicy::default()),
            LoaderHooks::default(),
            ready_response(&[]),
        );
        let mut component = WaitingStepListComponent::default();
        let text = draw(&mut component, &mut app);
        assert!(!text.contains(CHECKBOX_EMPTY));
        assert!(!text.contains(CHECKBOX_CHECKED));
        assert!(header_checkbox(&component).is_none());

        app.loader.list.set_rows(vec![student("a", 1)]);
        let text = draw(&mut component, &mut app);
        assert!(text.contains(CHECKBOX_EMPTY));
        assert!(header_checkbox(&component).is_some());
    }

    #[test]
    fn keyboard_selects_and_finds() {
        let mut app = loaded_app(
            selectable(SelectionPolicy::default()),
            LoaderHooks::default(),
            ready_response(&["a", "b"]),
        );
        let mut component = WaitingStepListComponent::default();
        press(&mut component, &mut app, KeyCode::Char('j'));
        press(&mut component, &mut app, KeyCode::Char(' '));
        assert_eq!(app.loader.list.selected_usernames(), vec!["b"]);
        assert_eq!(
            press(&mut component, &mut app, KeyCode::Enter),
            vec![Effect::FindLearner("b".into())]
        );

        press(&mut component, &mut app, KeyCode::Esc);
        assert_eq!(app.loader.list.selected_count(), 0);
        press(&mut component, &mut app, KeyCode::Char('a'));
        assert!(app.loader.list.all_selected());
        assert_eq!(
            press(&mut component, &mut app, KeyCode::Char('r')),
            vec![Effect::RefreshRequested]
        );
    }

    #[test]
    fn refresh_button_click_requests_refresh() {
        let mut app = loaded_app(
            WaitingStepListOptions::default(),
            LoaderHooks::default(),
            ready_response(&["a"]),
        );
        let mut component = WaitingStepListComponent::default();
        draw(&mut component, &mut app);
        let refresh = component.find_by_automation_id(REFRESH_BUTTON_ID).expect("refresh").rect();
        assert_eq!(click(&mut component, &mut app, refresh), vec![Effect::RefreshRequested]);
    }

    #[test]
    fn display_cells_follow_column_order() {
        let cells = display_cells(&student("myusername", 3), fixed_now());
        assert_eq!(cells, [
            "myusername".to_string(),
            "no".to_string(),
            "2".to_string(),
            "3 days".to_string(),
            "waiting".to_string(),
            String::new(),
        ]);
    }
}
