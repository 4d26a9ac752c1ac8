//! Application state for the waiting step viewer.
//!
//! `App` owns the details loader (and through it the learner table), the
//! injected theme and translator, and the focus ring. Components mutate it in
//! response to input; the runtime feeds it messages and executes the effects
//! it returns.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use peerwait_types::{Effect, Msg};
use peerwait_util::Translator;
use rat_focus::{Focus, FocusBuilder};
use tracing::info;

use crate::ui::components::details_loader::DetailsLoaderState;
use crate::ui::labels;
use crate::ui::theme::Theme;

/// Source of "now" used for relative time labels.
pub type Clock = fn() -> DateTime<Utc>;

pub struct App {
    pub loader: DetailsLoaderState,
    pub theme: Box<dyn Theme>,
    pub translator: Arc<dyn Translator>,
    pub focus: Focus,
    /// Frame counter for the loading throbber.
    pub throbber_idx: usize,
    /// One-line status shown under the table.
    pub status: Option<String>,
    /// Username passed to the most recent learner lookup.
    pub last_learner: Option<String>,
    pub should_quit: bool,
    clock: Clock,
}

impl App {
    pub fn new(loader: DetailsLoaderState, theme: Box<dyn Theme>, translator: Arc<dyn Translator>) -> Self {
        let mut app = Self {
            loader,
            theme,
            translator,
            focus: Focus::default(),
            throbber_idx: 0,
            status: None,
            last_learner: None,
            should_quit: false,
            clock: Utc::now,
        };
        app.rebuild_focus();
        app
    }

    /// Replace the wall clock (tests render against a fixed instant).
    #[cfg(test)]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Translate a label key through the injected translator.
    pub fn t(&self, key: &str) -> String {
        self.translator.translate(key)
    }

    /// Rebuild the focus ring so structural changes (e.g. the find action
    /// appearing) are reflected, keeping the current focus when possible.
    pub fn rebuild_focus(&mut self) {
        let old_focus = std::mem::take(&mut self.focus);
        self.focus = FocusBuilder::rebuild_for(&self.loader.list, Some(old_focus));
        if self.focus.focused().is_none() {
            self.focus.focus(&self.loader.list.f_grid);
        }
    }

    /// Apply a runtime message.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.loader.is_loading() {
                    self.throbber_idx = self.throbber_idx.wrapping_add(1);
                }
            }
            Msg::Resize(..) => {}
            Msg::WaitingStepFetched { request_id, response } => {
                if self.loader.apply(*request_id, response.clone()) {
                    self.throbber_idx = 0;
                    self.status = None;
                }
            }
        }
        Vec::new()
    }

    /// Handle effects that do not need the async runtime. Returns follow-up
    /// effects (e.g. the fetch issued by a refresh).
    pub fn dispatch(&mut self, effect: Effect) -> Vec<Effect> {
        match effect {
            Effect::RefreshRequested => vec![self.loader.refresh()],
            Effect::FindLearner(username) => {
                info!(%username, "learner lookup requested");
                self.loader.hooks.find_learner(&username);
                self.status = Some(format!("{}: {}", self.t(labels::LOOKING_UP), username));
                self.last_learner = Some(username);
                Vec::new()
            }
            Effect::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            fetch @ Effect::FetchWaitingStep { .. } => vec![fetch],
        }
    }
}
