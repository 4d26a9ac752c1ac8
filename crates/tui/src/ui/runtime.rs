//! Runtime: unified event loop and input routing for the viewer.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode, mouse capture).
//! - Drive a single event loop over input, ticks, completed fetches and Ctrl+C.
//! - Route input to the details loader component and execute returned `Effect`s.
//!
//! Ticking strategy: fast interval (100 ms) while the loader is waiting for a
//! response so the throbber animates; long interval (5 s) when idle.
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use peerwait_api::WaitingStepFetcher;
use peerwait_types::{Effect, Msg};
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::app::App;
use crate::cmd;
use crate::ui::components::DetailsLoaderComponent;
use crate::ui::components::component::Component;

/// Spawn a dedicated input task that polls terminal input and forwards
/// `crossterm` events over a Tokio channel.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    let mut last_mouse_event = Instant::now();

    tokio::task::spawn_blocking(move || {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            match event::poll(sixteen_ms) {
                Ok(true) => {}
                Ok(false) => {
                    if sender.is_closed() {
                        break;
                    }
                    continue;
                }
                Err(error) => {
                    tracing::warn!("Failed to poll event: {}", error);
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    // Throttle mouse move events to once per 16 ms.
                    let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                    if is_mouse_move {
                        if last_mouse_event.elapsed() < sixteen_ms {
                            continue;
                        }
                        last_mouse_event = Instant::now();
                    }
                    if let Err(error) = sender.blocking_send(event) {
                        tracing::warn!("Failed to send event: {}", error);
                        break;
                    }
                }
                Err(error) => {
                    tracing::warn!("Failed to read event: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    view: &mut DetailsLoaderComponent,
) -> Result<()> {
    // Rebuild focus just before rendering so structure changes are reflected
    app.rebuild_focus();
    terminal.draw(|frame| {
        let area = frame.area();
        view.render(frame, area, app);
    })?;
    Ok(())
}

fn is_quit_key(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('q') || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Handle raw crossterm input events and update `App`/components.
fn handle_input_event(app: &mut App, view: &mut DetailsLoaderComponent, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) if is_quit_key(&key_event) => vec![Effect::Quit],
        Event::Key(key_event) => view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => app.update(&Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Entry point for the viewer runtime: sets up the terminal, mounts the
/// loader, runs the async event loop, and performs cleanup on exit.
pub async fn run_app(mut app: App, fetcher: Arc<dyn WaitingStepFetcher>) -> Result<App> {
    let mut input_receiver = spawn_input_thread();
    let mut view = DetailsLoaderComponent::default();
    let mut terminal = setup_terminal()?;

    let mut pending_fetches: FuturesUnordered<JoinHandle<Msg>> = FuturesUnordered::new();
    let mounted = app.loader.mount();
    pending_fetches.extend(cmd::run_from_effects(&mut app, mounted, &fetcher));

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut view)?;

    while !app.should_quit {
        let needs_animation = app.loader.is_loading();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut effects: Vec<Effect> = Vec::new();
        let needs_render = tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                effects.extend(handle_input_event(&mut app, &mut view, event));
                true
            }

            _ = ticker.tick() => {
                effects.extend(app.update(&Msg::Tick));
                needs_animation
            }

            Some(joined) = pending_fetches.next(), if !pending_fetches.is_empty() => {
                match joined {
                    Ok(msg) => effects.extend(app.update(&msg)),
                    Err(error) => tracing::warn!("Fetch task failed: {}", error),
                }
                true
            }

            _ = signal::ctrl_c() => { break; }
        };

        if !effects.is_empty() {
            pending_fetches.extend(cmd::run_from_effects(&mut app, effects, &fetcher));
        }

        if needs_render && !app.should_quit {
            render(&mut terminal, &mut app, &mut view)?;
        }
    }

    cleanup_terminal(&mut terminal)?;
    Ok(app)
}
