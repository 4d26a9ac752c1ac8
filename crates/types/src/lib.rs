//! Shared type definitions for the peer waiting step viewer.
//!
//! Payload types decoded from the waiting step endpoint live in [`student`]
//! and [`details`]; the table's selection configuration lives in
//! [`selection`]. The [`Msg`] and [`Effect`] enums form the contract between
//! UI components and the runtime loop.

pub mod details;
pub mod selection;
pub mod student;

pub use details::{FetchResponse, LoadState, WaitingStepDetails};
pub use selection::{EmptySelectionPolicy, FindAction, MultiSelectPolicy, ParsePolicyError, SelectionPolicy};
pub use student::{GradeTally, StudentRow, Timestamp};

/// Messages delivered to components by the runtime.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (e.g., throbbers)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// A fetch issued with `request_id` finished.
    WaitingStepFetched { request_id: u64, response: FetchResponse },
}

/// Side effects requested by components and executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch waiting step details; the result is tagged with `request_id`.
    FetchWaitingStep { request_id: u64, url: String },
    /// The user asked for fresh data.
    RefreshRequested,
    /// Look up the given learner.
    FindLearner(String),
    /// Leave the application.
    Quit,
}
