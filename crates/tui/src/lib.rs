//! # Peerwait TUI Library
//!
//! Terminal viewer for a peer-assessment waiting step: it fetches the list of
//! learners waiting for peer grades, renders them in a table, and lets staff
//! select a single learner to look up.
//!
//! ## Architecture
//!
//! - `DetailsLoader` owns the fetch lifecycle (loading / error / ready) and
//!   guards against stale responses with monotonically increasing request ids.
//! - `WaitingStepList` renders the learners and tracks row selection; the find
//!   learner action is enabled only when exactly one row is selected.
//! - Components return `Effect`s; `cmd` turns fetch effects into spawned tasks
//!   and the runtime feeds their results back as `Msg`s.

mod app;
mod cmd;
mod plain;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use peerwait_api::WaitingStepFetcher;
use peerwait_util::{IdentityTranslator, Translator};

pub use plain::render_plain_table;
pub use ui::components::details_loader::LoaderHooks;
pub use ui::components::waiting_step_list::{FIND_LEARNER_BUTTON_ID, WaitingStepListOptions};

use crate::app::App;
use crate::ui::components::details_loader::DetailsLoaderState;

/// Everything the viewer needs besides the fetcher and the host hooks.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub waiting_step_data_url: String,
    pub options: WaitingStepListOptions,
    /// Requested theme id; `TUI_THEME` still takes precedence.
    pub theme: Option<String>,
    pub translator: Arc<dyn Translator>,
}

impl ViewerConfig {
    pub fn new(waiting_step_data_url: impl Into<String>) -> Self {
        Self {
            waiting_step_data_url: waiting_step_data_url.into(),
            options: WaitingStepListOptions::default(),
            theme: None,
            translator: Arc::new(IdentityTranslator),
        }
    }
}

/// What the session produced once the user quits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Username passed to the last learner lookup, if any.
    pub last_learner: Option<String>,
}

/// Runs the viewer until the user quits.
///
/// Sets up the terminal, mounts the loader (which issues the first fetch),
/// and drives the event loop.
///
/// # Errors
///
/// Terminal setup or teardown failures. Fetch failures are shown in the UI
/// and never surface here.
pub async fn run(config: ViewerConfig, fetcher: Arc<dyn WaitingStepFetcher>, hooks: LoaderHooks) -> Result<RunOutcome> {
    let ViewerConfig {
        waiting_step_data_url,
        options,
        theme,
        translator,
    } = config;
    let loader = DetailsLoaderState::new(waiting_step_data_url, options, hooks);
    let app = App::new(loader, ui::theme::load(theme.as_deref()), translator);

    let app = ui::runtime::run_app(app, fetcher).await?;
    Ok(RunOutcome {
        last_learner: app.last_learner,
    })
}
