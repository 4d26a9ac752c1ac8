//! Utility helpers shared by the peerwait crates: relative time labels,
//! translation lookup, path handling and persisted preferences.

pub mod i18n;
pub mod path_processing;
pub mod preferences;
pub mod relative_time;

pub use i18n::{CatalogError, CatalogTranslator, IdentityTranslator, Translator};
pub use path_processing::expand_tilde;
pub use preferences::{PreferencesError, PreferencesPayload, UserPreferences};
pub use relative_time::{RelativeSpan, readable_time_since};
