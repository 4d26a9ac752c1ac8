use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use peerwait_api::WaitingStepClient;
use peerwait_tui::{LoaderHooks, ViewerConfig, WaitingStepListOptions, render_plain_table};
use peerwait_types::{EmptySelectionPolicy, MultiSelectPolicy, SelectionPolicy};
use peerwait_util::{CatalogTranslator, IdentityTranslator, PreferencesPayload, Translator, UserPreferences, expand_tilde};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const LOG_FILE_ENV: &str = "PEERWAIT_LOG_FILE";

/// Browse the learners waiting on a peer-assessment step.
#[derive(Debug, Parser)]
#[command(name = "peerwait", version, about)]
struct Cli {
    /// Endpoint returning the waiting step payload.
    url: String,

    /// Show the selection column and the find learner action.
    #[arg(long)]
    selectable: bool,

    /// Find action while nothing is selected: `hide` or `disable`.
    #[arg(long, value_name = "POLICY")]
    empty_selection: Option<EmptySelectionPolicy>,

    /// Second selection behaviour: `reject` (allowed, action refused) or `lock`.
    #[arg(long, value_name = "POLICY")]
    multi_select: Option<MultiSelectPolicy>,

    /// JSON object mapping label keys to translated text.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Theme id (dracula, nord, ansi256); saved as the preferred theme.
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Write logs to this file (defaults to `PEERWAIT_LOG_FILE`).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Fetch once and print a plain-text table instead of starting the TUI.
    #[arg(long)]
    dump: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.clone())?;

    let preferences = UserPreferences::new().unwrap_or_else(|error| {
        warn!("Failed to load preferences, falling back to in-memory store: {}", error);
        UserPreferences::ephemeral()
    });
    if let Some(theme) = cli.theme.as_ref()
        && let Err(error) = preferences.set_preferred_theme(Some(theme.clone()))
    {
        warn!("Failed to persist preferred theme: {}", error);
    }

    let translator = load_translator(cli.catalog.as_deref())?;
    let options = resolve_options(&cli, &preferences.snapshot());
    let client = WaitingStepClient::from_env().context("failed to build the waiting step client")?;

    if cli.dump {
        let details = client
            .try_fetch(&cli.url)
            .await
            .with_context(|| format!("failed to fetch waiting step details from {}", cli.url))?;
        print!("{}", render_plain_table(&details, translator.as_ref(), Utc::now()));
        return Ok(());
    }

    let config = ViewerConfig {
        waiting_step_data_url: cli.url.clone(),
        options,
        theme: cli.theme.clone().or_else(|| preferences.preferred_theme()),
        translator,
    };
    let hooks = LoaderHooks::default()
        .with_on_mount(|| info!("waiting step viewer mounted"))
        .with_on_find_learner(|username| info!(%username, "find learner requested"));

    let outcome = peerwait_tui::run(config, Arc::new(client), hooks).await?;
    if let Some(username) = outcome.last_learner {
        println!("{username}");
    }
    Ok(())
}

/// Install the tracing subscriber. The TUI owns the terminal, so logs only go
/// to a file; without one they are discarded.
fn init_tracing(log_file: Option<PathBuf>) -> Result<()> {
    let path = log_file.or_else(|| {
        std::env::var(LOG_FILE_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| expand_tilde(value.trim()))
    });
    let Some(path) = path else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn load_translator(catalog: Option<&Path>) -> Result<Arc<dyn Translator>> {
    match catalog {
        Some(path) => {
            let path = expand_tilde(&path.to_string_lossy());
            let translator = CatalogTranslator::from_path(&path)
                .with_context(|| format!("failed to load translation catalog {}", path.display()))?;
            info!(entries = translator.len(), "translation catalog loaded");
            Ok(Arc::new(translator))
        }
        None => Ok(Arc::new(IdentityTranslator)),
    }
}

/// CLI flags win over saved preferences, which win over the defaults.
fn resolve_options(cli: &Cli, saved: &PreferencesPayload) -> WaitingStepListOptions {
    WaitingStepListOptions {
        selectable_learners_enabled: cli.selectable || saved.selectable_learners_enabled.unwrap_or(false),
        selection_policy: SelectionPolicy {
            empty: cli.empty_selection.or(saved.empty_selection).unwrap_or_default(),
            multi: cli.multi_select.or(saved.multi_select).unwrap_or_default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_saved_preferences() {
        let cli = Cli::parse_from(["peerwait", "https://example.com/waiting", "--multi-select", "lock"]);
        let saved = PreferencesPayload {
            selectable_learners_enabled: Some(true),
            empty_selection: Some(EmptySelectionPolicy::DisableWhenEmpty),
            multi_select: Some(MultiSelectPolicy::AllowMultiToggleThenReject),
            ..PreferencesPayload::default()
        };
        let options = resolve_options(&cli, &saved);
        assert!(options.selectable_learners_enabled);
        assert_eq!(options.selection_policy.empty, EmptySelectionPolicy::DisableWhenEmpty);
        assert_eq!(options.selection_policy.multi, MultiSelectPolicy::LockOthersOnSelect);
    }

    #[test]
    fn defaults_hide_and_reject() {
        let cli = Cli::parse_from(["peerwait", "https://example.com/waiting"]);
        let options = resolve_options(&cli, &PreferencesPayload::default());
        assert!(!options.selectable_learners_enabled);
        assert_eq!(options.selection_policy, SelectionPolicy::default());
    }

    #[test]
    fn rejects_unknown_policy() {
        let parsed = Cli::try_parse_from(["peerwait", "https://example.com/waiting", "--empty-selection", "maybe"]);
        assert!(parsed.is_err());
    }
}
