//! Selection bookkeeping for the waiting step learner table.

use std::collections::BTreeSet;

use peerwait_types::{Effect, FindAction, MultiSelectPolicy, SelectionPolicy, StudentRow};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::TableState};

/// Host-facing options for the learner table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitingStepListOptions {
    /// Shows the selection column and the find learner action.
    pub selectable_learners_enabled: bool,
    pub selection_policy: SelectionPolicy,
}

/// State container for the learner table: the rows, the highlight cursor and
/// the set of selected rows.
///
/// Selection is reset whenever the rows are replaced and is never persisted.
#[derive(Debug, Clone)]
pub struct WaitingStepListState {
    /// Root focus scope for the table cluster.
    pub container_focus: FocusFlag,
    /// Focus flag for the grid of learner rows.
    pub f_grid: FocusFlag,
    pub f_refresh: FocusFlag,
    pub f_find: FocusFlag,
    /// Highlight cursor and scroll offset for the rendered table.
    pub table_state: TableState,
    rows: Vec<StudentRow>,
    selected: BTreeSet<usize>,
    options: WaitingStepListOptions,
}

impl WaitingStepListState {
    pub fn new(options: WaitingStepListOptions) -> Self {
        Self {
            container_focus: FocusFlag::named("waiting_step.list"),
            f_grid: FocusFlag::named("waiting_step.grid"),
            f_refresh: FocusFlag::named("waiting_step.refresh"),
            f_find: FocusFlag::named("waiting_step.find_learner"),
            table_state: TableState::default(),
            rows: Vec::new(),
            selected: BTreeSet::new(),
            options,
        }
    }

    /// Replace the rows wholesale, clearing the selection.
    pub fn set_rows(&mut self, rows: Vec<StudentRow>) {
        self.rows = rows;
        self.selected.clear();
        self.table_state = TableState::default();
        if !self.rows.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    pub fn rows(&self) -> &[StudentRow] {
        &self.rows
    }

    pub fn selection_enabled(&self) -> bool {
        self.options.selectable_learners_enabled
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected_usernames(&self) -> Vec<&str> {
        self.selected
            .iter()
            .filter_map(|&index| self.rows.get(index))
            .map(|row| row.username.as_str())
            .collect()
    }

    /// Whether the row's checkbox is locked because another row holds the
    /// single allowed selection.
    pub fn is_locked(&self, index: usize) -> bool {
        self.options.selection_policy.multi == MultiSelectPolicy::LockOthersOnSelect
            && !self.selected.is_empty()
            && !self.selected.contains(&index)
    }

    /// The header "select all" checkbox only exists when several rows may be selected.
    pub fn has_header_checkbox(&self) -> bool {
        self.selection_enabled()
            && self.options.selection_policy.multi == MultiSelectPolicy::AllowMultiToggleThenReject
    }

    pub fn all_selected(&self) -> bool {
        !self.rows.is_empty() && self.selected.len() == self.rows.len()
    }

    /// Toggle the selection of a single row.
    ///
    /// Returns `false` when nothing changed: selection disabled, index out of
    /// range, or the row is locked.
    pub fn toggle_row(&mut self, index: usize) -> bool {
        if !self.selection_enabled() || index >= self.rows.len() || self.is_locked(index) {
            return false;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        true
    }

    /// Header checkbox: select every row, or clear when all are already selected.
    pub fn toggle_all(&mut self) -> bool {
        if !self.has_header_checkbox() || self.rows.is_empty() {
            return false;
        }
        if self.all_selected() {
            self.selected.clear();
        } else {
            self.selected = (0..self.rows.len()).collect();
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.table_state.selected().filter(|&index| index < self.rows.len())
    }

    pub fn highlight(&mut self, index: usize) {
        if index < self.rows.len() {
            self.table_state.select(Some(index));
        }
    }

    pub fn move_highlight_up(&mut self) {
        if let Some(index) = self.highlighted() {
            self.table_state.select(Some(index.saturating_sub(1)));
        }
    }

    pub fn move_highlight_down(&mut self) {
        match self.highlighted() {
            Some(index) if index + 1 < self.rows.len() => self.table_state.select(Some(index + 1)),
            None if !self.rows.is_empty() => self.table_state.select(Some(0)),
            _ => {}
        }
    }

    pub fn toggle_highlighted(&mut self) -> bool {
        self.highlighted().is_some_and(|index| self.toggle_row(index))
    }

    /// Render state of the find learner action; depends only on cardinality.
    pub fn find_action(&self) -> FindAction {
        FindAction::derive(
            self.selection_enabled(),
            self.options.selection_policy.empty,
            self.selected_count(),
        )
    }

    /// Activate the find learner action.
    ///
    /// Yields the lookup effect with the selected username only when exactly
    /// one row is selected.
    pub fn activate_find(&self) -> Option<Effect> {
        if !self.find_action().is_enabled() {
            return None;
        }
        let username = self.selected_usernames().into_iter().next()?;
        Some(Effect::FindLearner(username.to_string()))
    }

    /// Activate the refresh action; independent of the selection.
    pub fn activate_refresh(&self) -> Effect {
        Effect::RefreshRequested
    }
}

impl HasFocus for WaitingStepListState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_grid);
        builder.leaf_widget(&self.f_refresh);
        if self.find_action().is_visible() {
            builder.leaf_widget(&self.f_find);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerwait_types::{EmptySelectionPolicy, GradeTally, Timestamp};

    fn student(username: &str) -> StudentRow {
        StudentRow {
            username: username.to_string(),
            graded: GradeTally::Flag(false),
            graded_by: GradeTally::Text("2".into()),
            created_at: Timestamp::from_millis(1_700_000_000_000).expect("in range"),
            staff_grade_status: "waiting".into(),
            workflow_status: String::new(),
        }
    }

    fn list(usernames: &[&str], policy: SelectionPolicy) -> WaitingStepListState {
        let mut state = WaitingStepListState::new(WaitingStepListOptions {
            selectable_learners_enabled: true,
            selection_policy: policy,
        });
        state.set_rows(usernames.iter().map(|name| student(name)).collect());
        state
    }

    #[test]
    fn single_selection_emits_lookup_once() {
        let mut state = list(&["myusername"], SelectionPolicy::default());
        assert!(state.toggle_row(0));
        assert_eq!(state.find_action(), FindAction::Enabled);
        assert_eq!(state.activate_find(), Some(Effect::FindLearner("myusername".into())));
    }

    #[test]
    fn two_selected_rows_reject_the_lookup() {
        let mut state = list(&["myusername", "timmy_turner"], SelectionPolicy::default());
        assert!(state.toggle_row(0));
        assert!(state.toggle_row(1));
        assert!(state.is_selected(0) && state.is_selected(1));
        assert_eq!(
            state.find_action(),
            FindAction::Disabled {
                invalid_selection: true
            }
        );
        assert_eq!(state.activate_find(), None);
    }

    #[test]
    fn empty_selection_hides_action_by_default() {
        let state = list(&["myusername"], SelectionPolicy::default());
        assert_eq!(state.find_action(), FindAction::Hidden);
        assert_eq!(state.activate_find(), None);
    }

    #[test]
    fn disable_when_empty_keeps_action_visible() {
        let policy = SelectionPolicy {
            empty: EmptySelectionPolicy::DisableWhenEmpty,
            ..SelectionPolicy::default()
        };
        let state = list(&["myusername"], policy);
        assert!(state.find_action().is_visible());
        assert_eq!(state.activate_find(), None);
    }

    #[test]
    fn lock_policy_refuses_second_selection() {
        let policy = SelectionPolicy {
            multi: MultiSelectPolicy::LockOthersOnSelect,
            ..SelectionPolicy::default()
        };
        let mut state = list(&["a", "b", "c"], policy);
        assert!(!state.has_header_checkbox());
        assert!(state.toggle_row(1));
        assert!(state.is_locked(0));
        assert!(!state.is_locked(1));
        assert!(!state.toggle_row(0));
        assert_eq!(state.selected_usernames(), vec!["b"]);

        assert!(state.toggle_row(1));
        assert!(!state.is_locked(0));
        assert!(state.toggle_row(0));
        assert_eq!(state.activate_find(), Some(Effect::FindLearner("a".into())));
    }

    #[test]
    fn header_checkbox_selects_then_clears_all() {
        let mut state = list(&["a", "b"], SelectionPolicy::default());
        assert!(state.has_header_checkbox());
        assert!(state.toggle_all());
        assert!(state.all_selected());
        assert_eq!(state.activate_find(), None);
        assert!(state.toggle_all());
        assert_eq!(state.selected_count(), 0);
    }

    #[test]
    fn selection_disabled_ignores_toggles() {
        let mut state = WaitingStepListState::new(WaitingStepListOptions::default());
        state.set_rows(vec![student("a")]);
        assert!(!state.toggle_row(0));
        assert!(!state.toggle_all());
        assert!(!state.has_header_checkbox());
        assert_eq!(state.find_action(), FindAction::Hidden);
    }

    #[test]
    fn replacing_rows_resets_selection_and_highlight() {
        let mut state = list(&["a", "b"], SelectionPolicy::default());
        state.highlight(1);
        state.toggle_row(1);
        state.set_rows(vec![student("c")]);
        assert_eq!(state.selected_count(), 0);
        assert_eq!(state.highlighted(), Some(0));
        assert_eq!(state.rows()[0].username, "c");
    }

    #[test]
    fn highlight_moves_within_bounds() {
        let mut state = list(&["a", "b"], SelectionPolicy::default());
        state.move_highlight_up();
        assert_eq!(state.highlighted(), Some(0));
        state.move_highlight_down();
        state.move_highlight_down();
        assert_eq!(state.highlighted(), Some(1));
        assert!(state.toggle_highlighted());
        assert_eq!(state.selected_usernames(), vec!["b"]);
    }

    #[test]
    fn out_of_range_toggle_is_ignored() {
        let mut state = list(&["a"], SelectionPolicy::default());
        assert!(!state.toggle_row(3));
    }

    #[test]
    fn refresh_is_independent_of_selection() {
        let mut state = list(&["a", "b"], SelectionPolicy::default());
        assert_eq!(state.activate_refresh(), Effect::RefreshRequested);
        state.toggle_all();
        assert_eq!(state.activate_refresh(), Effect::RefreshRequested);
    }
}
