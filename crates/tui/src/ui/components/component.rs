//! Component system for the waiting step viewer.
//!
//! Components are self-contained UI elements that handle their own events and
//! rendering while integrating with the application through a consistent
//! interface. State lives on [`App`]; components keep only per-frame data
//! such as hit areas.

use crossterm::event::{KeyEvent, MouseEvent};
use peerwait_types::Effect;
use ratatui::{Frame, layout::Rect};

use crate::app::App;

/// A trait representing a UI component with its own behavior.
///
/// Components handle localized events, update state on the `App`, and render
/// themselves into a provided `Rect`, reporting any side effects back to the
/// runtime as [`Effect`]s.
///
/// # Component Lifecycle
///
/// 1. **Event Handling**: `handle_key_events()` / `handle_mouse_events()`
/// 2. **Rendering**: `render()` draws into the frame and records hit areas
pub(crate) trait Component {
    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events. Hit testing uses the areas recorded during the
    /// last `render`.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should be side-effect free except for frame drawing and
    /// recording hit areas; state changes belong in the event handlers.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);
}
