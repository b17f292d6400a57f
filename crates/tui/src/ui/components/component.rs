//! Component system for the Docent TUI.
//!
//! A component owns local UI behaviour for one pane (sidebar, content,
//! chat). It reads and mutates its slice of [`App`] state, renders into a
//! `Rect`, and reports anything with wider reach back as [`Effect`]s for the
//! runtime to apply.

use crossterm::event::{KeyEvent, MouseEvent};
use docent_types::{Effect, Msg};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::App;

/// A UI component with its own state and behavior.
///
/// Lifecycle: messages arrive through [`Component::handle_message`], input
/// through the key and mouse handlers, and [`Component::render`] draws the
/// current state. Handlers return effects instead of touching cross-cutting
/// state such as the active topic.
pub(crate) trait Component {
    /// Handle an application-level message the component cares about.
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events while this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events. Components hit-test against the areas they
    /// recorded during their last render.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Draw the component into `rect`.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the bottom bar while this component has focus.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Sub-areas the component splits `area` into.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }
}
