//! Waiting step payloads and the loader lifecycle.

use serde::{Deserialize, Serialize};

use crate::student::{GradeTally, StudentRow};

/// Everything the waiting step endpoint returns for one assessment step.
///
/// `Default` is the empty value shown before the first successful load and
/// restored after a failed one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitingStepDetails {
    #[serde(default)]
    pub display_name: String,
    /// How many peers must grade a learner before they leave the step.
    #[serde(default)]
    pub must_be_graded_by: GradeTally,
    /// How many peers a learner must grade.
    #[serde(default)]
    pub must_grade: GradeTally,
    #[serde(default)]
    pub student_data: Vec<StudentRow>,
}

/// Result of a single fetch attempt.
///
/// Failures never surface as errors to the UI; they are reported through the
/// `success` flag alone and `waiting_step_data` is left at its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    pub success: bool,
    #[serde(default)]
    pub waiting_step_data: WaitingStepDetails,
}

impl FetchResponse {
    pub fn succeeded(waiting_step_data: WaitingStepDetails) -> Self {
        Self {
            success: true,
            waiting_step_data,
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }
}

/// Mutually exclusive states of the details loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Error,
    Ready,
}
