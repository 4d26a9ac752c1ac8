//! # Command Execution Layer
//!
//! This module translates application effects (`Effect`) into imperative
//! commands (`Cmd`) and executes them. It is the boundary where the pure
//! state of the viewer meets side effects such as fetching waiting step data.
//!
//! ## Design
//! - [`Cmd`] is the effectful command type.
//! - [`from_effects`] resolves state-only effects on the `App` and collects
//!   the rest as [`Cmd`]s.
//! - [`run_cmds`] spawns each command as a task that resolves to a [`Msg`].
//!
//! State updates stay pure; commands own the I/O.

use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use peerwait_api::WaitingStepFetcher;
use peerwait_types::{Effect, FetchResponse, Msg};
use tokio::task::{JoinHandle, spawn};
use tracing::{debug, warn};

use crate::app::App;

/// Side-effectful work executed outside of state updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// GET the waiting step payload; the result is tagged with `request_id`.
    FetchWaitingStep { request_id: u64, url: String },
}

/// Drain `effects`, applying state-only ones to `app` (including any
/// follow-up effects they produce) and returning the commands to execute.
pub fn from_effects(app: &mut App, effects: Vec<Effect>) -> Vec<Cmd> {
    let mut queue: VecDeque<Effect> = effects.into();
    let mut commands = Vec::new();
    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::FetchWaitingStep { request_id, url } => {
                commands.push(Cmd::FetchWaitingStep { request_id, url });
            }
            other => queue.extend(app.dispatch(other)),
        }
    }
    commands
}

/// Spawn each command; every handle resolves to the message to feed back into the app.
///
/// A fetcher that panics still yields a tagged failure so the loader leaves `Loading`.
pub fn run_cmds(commands: Vec<Cmd>, fetcher: &Arc<dyn WaitingStepFetcher>) -> Vec<JoinHandle<Msg>> {
    commands
        .into_iter()
        .map(|command| match command {
            Cmd::FetchWaitingStep { request_id, url } => {
                debug!(request_id, %url, "spawning waiting step fetch");
                let fetcher = Arc::clone(fetcher);
                spawn(async move {
                    let response = AssertUnwindSafe(fetcher.fetch(&url))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|_| {
                            warn!(request_id, "waiting step fetch panicked");
                            FetchResponse::failed()
                        });
                    Msg::WaitingStepFetched { request_id, response }
                })
            }
        })
        .collect()
}

/// Convenience wrapper: resolve `effects` against `app` and spawn the resulting commands.
pub fn run_from_effects(app: &mut App, effects: Vec<Effect>, fetcher: &Arc<dyn WaitingStepFetcher>) -> Vec<JoinHandle<Msg>> {
    run_cmds(from_effects(app, effects), fetcher)
}
