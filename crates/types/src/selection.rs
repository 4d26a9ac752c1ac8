//! Selection policies for the learner table and the gated find action.

use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// What the find action does while no row is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptySelectionPolicy {
    /// The action is not rendered at all.
    #[default]
    HideWhenEmpty,
    /// The action is rendered but disabled.
    DisableWhenEmpty,
}

/// Whether a second row can be selected while one is already selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MultiSelectPolicy {
    /// Any number of rows can be toggled; the find action rejects anything but one.
    #[default]
    AllowMultiToggleThenReject,
    /// Selecting a row locks every other row until it is deselected.
    LockOthersOnSelect,
}

/// Combined selection configuration for the learner table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionPolicy {
    #[serde(default)]
    pub empty: EmptySelectionPolicy,
    #[serde(default)]
    pub multi: MultiSelectPolicy,
}

/// Render state of the find learner action, derived from selection cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindAction {
    Hidden,
    Disabled { invalid_selection: bool },
    Enabled,
}

impl FindAction {
    /// Derive the action state from the policy and the number of selected rows.
    pub fn derive(selection_enabled: bool, policy: EmptySelectionPolicy, selected_count: usize) -> Self {
        if !selection_enabled {
            return FindAction::Hidden;
        }
        match (selected_count, policy) {
            (0, EmptySelectionPolicy::HideWhenEmpty) => FindAction::Hidden,
            (0, EmptySelectionPolicy::DisableWhenEmpty) => FindAction::Disabled {
                invalid_selection: false,
            },
            (1, _) => FindAction::Enabled,
            _ => FindAction::Disabled {
                invalid_selection: true,
            },
        }
    }

    pub fn is_visible(self) -> bool {
        !matches!(self, FindAction::Hidden)
    }

    pub fn is_enabled(self) -> bool {
        matches!(self, FindAction::Enabled)
    }
}

impl FromStr for EmptySelectionPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hide" | "hide-when-empty" => Ok(Self::HideWhenEmpty),
            "disable" | "disable-when-empty" => Ok(Self::DisableWhenEmpty),
            _ => Err(ParsePolicyError {
                expected: "'hide' or 'disable'",
            }),
        }
    }
}

impl FromStr for MultiSelectPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" | "allow-multi-toggle-then-reject" => Ok(Self::AllowMultiToggleThenReject),
            "lock" | "lock-others-on-select" => Ok(Self::LockOthersOnSelect),
            _ => Err(ParsePolicyError {
                expected: "'reject' or 'lock'",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsePolicyError {
    expected: &'static str,
}

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid selection policy; expected {}", self.expected)
    }
}

impl Error for ParsePolicyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_action_is_hidden_without_selection_support() {
        for count in 0..3 {
            assert_eq!(
                FindAction::derive(false, EmptySelectionPolicy::DisableWhenEmpty, count),
                FindAction::Hidden
            );
        }
    }

    #[test]
    fn find_action_follows_cardinality() {
        let policy = EmptySelectionPolicy::HideWhenEmpty;
        assert_eq!(FindAction::derive(true, policy, 0), FindAction::Hidden);
        assert_eq!(FindAction::derive(true, policy, 1), FindAction::Enabled);
        assert_eq!(
            FindAction::derive(true, policy, 2),
            FindAction::Disabled {
                invalid_selection: true
            }
        );
    }

    #[test]
    fn disable_when_empty_renders_without_message() {
        let action = FindAction::derive(true, EmptySelectionPolicy::DisableWhenEmpty, 0);
        assert!(action.is_visible());
        assert!(!action.is_enabled());
        assert_eq!(
            action,
            FindAction::Disabled {
                invalid_selection: false
            }
        );
    }

    #[test]
    fn policies_parse_short_and_long_names() {
        assert_eq!("hide".parse(), Ok(EmptySelectionPolicy::HideWhenEmpty));
        assert_eq!("Disable-When-Empty".parse(), Ok(EmptySelectionPolicy::DisableWhenEmpty));
        assert_eq!("lock".parse(), Ok(MultiSelectPolicy::LockOthersOnSelect));
        assert_eq!("reject".parse(), Ok(MultiSelectPolicy::AllowMultiToggleThenReject));
        assert!("radio".parse::<MultiSelectPolicy>().is_err());
    }
}
