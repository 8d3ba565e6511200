//! Component system for the guide TUI.
//!
//! Components are stateless renderers and event routers. Their state lives on
//! `App` so the focus tree and the effect processor can reach it; a component
//! receives `&mut App`, mutates the slice it owns and reports everything else
//! back as `Effect`s.

use crossterm::event::{KeyEvent, MouseEvent};
use guidekit_types::{Effect, Msg};
use ratatui::{Frame, layout::Rect, text::Span};

use crate::app::App;

/// A UI component with its own event handling and rendering.
///
/// Event handlers return the effects the runtime should apply; components
/// never mutate state owned by a sibling directly.
pub(crate) trait Component {
    /// Handle an application-level message such as a tick or resize.
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events while this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events; implementations hit-test against their last
    /// rendered area.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Draw the component into `rect`.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the hint bar while the component is focused.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Areas the component splits `area` into, in rendering order.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }
}

/// Index of the row in `areas` containing `(x, y)`, if the point is inside
/// `container`.
pub(crate) fn find_target_index_by_mouse_position(container: &Rect, areas: &[Rect], x: u16, y: u16) -> Option<usize> {
    let position = ratatui::layout::Position { x, y };
    if !container.contains(position) {
        return None;
    }
    areas.iter().position(|area| area.contains(position))
}
