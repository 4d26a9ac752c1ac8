//! Fetch lifecycle for the waiting step details container.

use std::fmt;

use peerwait_types::{Effect, FetchResponse, LoadState, WaitingStepDetails};
use tracing::{debug, info};

use crate::ui::components::waiting_step_list::{WaitingStepListOptions, WaitingStepListState};

type MountHook = Box<dyn FnMut() + Send>;
type FindLearnerHook = Box<dyn FnMut(&str) + Send>;

/// Host callbacks. Both default to no-ops.
#[derive(Default)]
pub struct LoaderHooks {
    on_mount: Option<MountHook>,
    on_find_learner: Option<FindLearnerHook>,
}

impl LoaderHooks {
    pub fn with_on_mount(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_mount = Some(Box::new(hook));
        self
    }

    pub fn with_on_find_learner(mut self, hook: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_find_learner = Some(Box::new(hook));
        self
    }

    pub(crate) fn mounted(&mut self) {
        if let Some(hook) = self.on_mount.as_mut() {
            hook();
        }
    }

    pub(crate) fn find_learner(&mut self, username: &str) {
        if let Some(hook) = self.on_find_learner.as_mut() {
            hook(username);
        }
    }
}

impl fmt::Debug for LoaderHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderHooks")
            .field("on_mount", &self.on_mount.is_some())
            .field("on_find_learner", &self.on_find_learner.is_some())
            .finish()
    }
}

/// Loading / error / ready state machine for one waiting step URL.
///
/// Every fetch is tagged with a monotonically increasing request id and only
/// the response to the most recent request is applied. The fetched
/// `student_data` is moved into [`WaitingStepListState`]; `details()` keeps
/// the step summary.
#[derive(Debug)]
pub struct DetailsLoaderState {
    waiting_step_data_url: String,
    load_state: LoadState,
    details: WaitingStepDetails,
    latest_request_id: u64,
    mounted: bool,
    pub list: WaitingStepListState,
    pub hooks: LoaderHooks,
}

impl DetailsLoaderState {
    pub fn new(waiting_step_data_url: impl Into<String>, options: WaitingStepListOptions, hooks: LoaderHooks) -> Self {
        Self {
            waiting_step_data_url: waiting_step_data_url.into(),
            load_state: LoadState::Loading,
            details: WaitingStepDetails::default(),
            latest_request_id: 0,
            mounted: false,
            list: WaitingStepListState::new(options),
            hooks,
        }
    }

    /// Run the mount hook and issue the first fetch. Subsequent calls are no-ops.
    pub fn mount(&mut self) -> Vec<Effect> {
        if self.mounted {
            return Vec::new();
        }
        self.mounted = true;
        self.hooks.mounted();
        vec![self.refresh()]
    }

    /// Re-enter `Loading`, clear any error, and issue a new tagged fetch.
    pub fn refresh(&mut self) -> Effect {
        self.latest_request_id += 1;
        self.load_state = LoadState::Loading;
        debug!(request_id = self.latest_request_id, "fetching waiting step details");
        Effect::FetchWaitingStep {
            request_id: self.latest_request_id,
            url: self.waiting_step_data_url.clone(),
        }
    }

    /// Apply a fetch result. Returns `false` when the response is stale, or
    /// answers no issued request, and was dropped.
    pub fn apply(&mut self, request_id: u64, response: FetchResponse) -> bool {
        if request_id == 0 || request_id != self.latest_request_id {
            debug!(
                request_id,
                latest = self.latest_request_id,
                "dropping stale waiting step response"
            );
            return false;
        }

        if response.success {
            let mut details = response.waiting_step_data;
            let students = std::mem::take(&mut details.student_data);
            info!(request_id, learners = students.len(), "waiting step details ready");
            self.list.set_rows(students);
            self.details = details;
            self.load_state = LoadState::Ready;
        } else {
            info!(request_id, "waiting step details unavailable");
            self.list.set_rows(Vec::new());
            self.details = WaitingStepDetails::default();
            self.load_state = LoadState::Error;
        }
        true
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// Step summary of the last successful load (rows live on `list`).
    pub fn details(&self) -> &WaitingStepDetails {
        &self.details
    }
}
