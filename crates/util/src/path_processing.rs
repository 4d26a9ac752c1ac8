//! Path helpers for user-supplied file locations (catalogs, log files,
//! preference overrides).

use std::path::PathBuf;

use dirs_next::home_dir;

/// Expand a leading `~` to the home directory and trim surrounding whitespace.
///
/// Paths without a leading tilde are returned unchanged. When the home
/// directory cannot be determined the tilde is kept literally.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));

    match trimmed.strip_prefix('~') {
        Some("") => home(),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => home().join(&rest[1..]),
        _ => PathBuf::from(trimmed),
    }
}
