use crossterm::event::{KeyCode, KeyEvent};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::debug;

use crate::ui::components::data_grid::CellPosition;

/// Whether a key handled by the popover may reach other handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPropagation {
    Stop,
    Continue,
}

/// Outcome of routing a key through the popover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopoverKeyResult {
    pub propagation: KeyPropagation,
    /// Set when the key dismissed the popover; focus goes back to this cell.
    pub dismissed_from: Option<CellPosition>,
    /// Footer action to run.
    pub run_action: Option<usize>,
}

impl PopoverKeyResult {
    fn passthrough() -> Self {
        Self {
            propagation: KeyPropagation::Continue,
            dismissed_from: None,
            run_action: None,
        }
    }

    fn stop() -> Self {
        Self {
            propagation: KeyPropagation::Stop,
            ..Self::passthrough()
        }
    }
}

/// Open/closed state of the grid's cell popover.
#[derive(Debug)]
pub struct CellPopoverState {
    is_open: bool,
    origin: Option<CellPosition>,
    action_count: usize,
    focused_action: usize,
    pub focus: FocusFlag,
    pub last_area: Rect,
    pub action_areas: Vec<Rect>,
}

impl Default for CellPopoverState {
    fn default() -> Self {
        Self {
            is_open: false,
            origin: None,
            action_count: 0,
            focused_action: 0,
            focus: FocusFlag::named("cell_popover"),
            last_area: Rect::default(),
            action_areas: Vec::new(),
        }
    }
}

impl CellPopoverState {
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn origin(&self) -> Option<CellPosition> {
        self.origin
    }

    pub fn focused_action(&self) -> usize {
        self.focused_action
    }

    pub fn open(&mut self, origin: CellPosition, action_count: usize) {
        debug!(row = origin.row, column = origin.column, "opening cell popover");
        self.is_open = true;
        self.origin = Some(origin);
        self.action_count = action_count;
        self.focused_action = 0;
    }

    /// Closes the popover. Returns the originating cell the first time it is
    /// called for an open popover and `None` afterwards.
    pub fn close(&mut self) -> Option<CellPosition> {
        if !self.is_open {
            return None;
        }
        self.is_open = false;
        self.last_area = Rect::default();
        self.action_areas.clear();
        self.origin.take()
    }

    pub fn cycle_action(&mut self, forward: bool) {
        if self.action_count == 0 {
            return;
        }
        self.focused_action = if forward {
            (self.focused_action + 1) % self.action_count
        } else {
            (self.focused_action + self.action_count - 1) % self.action_count
        };
    }

    /// Routes a key while the popover is open.
    ///
    /// F2 and Esc dismiss; footer navigation and Enter are consumed. Other
    /// keys continue to the application's global shortcuts.
    pub fn handle_key(&mut self, key: KeyEvent) -> PopoverKeyResult {
        if !self.is_open {
            return PopoverKeyResult::passthrough();
        }
        match key.code {
            KeyCode::F(2) | KeyCode::Esc => PopoverKeyResult {
                dismissed_from: self.close(),
                ..PopoverKeyResult::stop()
            },
            KeyCode::Right | KeyCode::Tab => {
                self.cycle_action(true);
                PopoverKeyResult::stop()
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.cycle_action(false);
                PopoverKeyResult::stop()
            }
            KeyCode::Enter if self.action_count > 0 => PopoverKeyResult {
                run_action: Some(self.focused_action),
                ..PopoverKeyResult::stop()
            },
            _ => PopoverKeyResult::passthrough(),
        }
    }
}

impl HasFocus for CellPopoverState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn f2_and_escape_dismiss_exactly_once() {
        for code in [KeyCode::F(2), KeyCode::Esc] {
            let mut popover = CellPopoverState::default();
            popover.open(CellPosition::new(2, 1), 0);

            let first = popover.handle_key(key(code));
            assert_eq!(first.propagation, KeyPropagation::Stop);
            assert_eq!(first.dismissed_from, Some(CellPosition::new(2, 1)));
            assert!(!popover.is_open());

            let second = popover.handle_key(key(code));
            assert_eq!(second.propagation, KeyPropagation::Continue);
            assert_eq!(second.dismissed_from, None);
            assert_eq!(popover.close(), None);
        }
    }

    #[test]
    fn footer_navigation_wraps_and_runs_focused_action() {
        let mut popover = CellPopoverState::default();
        popover.open(CellPosition::new(0, 0), 2);
        popover.handle_key(key(KeyCode::Left));
        assert_eq!(popover.focused_action(), 1);
        popover.handle_key(key(KeyCode::Tab));
        assert_eq!(popover.focused_action(), 0);

        let result = popover.handle_key(key(KeyCode::Enter));
        assert_eq!(result.run_action, Some(0));
        assert!(popover.is_open());
    }

    #[test]
    fn unrelated_keys_pass_through() {
        let mut popover = CellPopoverState::default();
        popover.open(CellPosition::new(0, 0), 0);
        assert_eq!(popover.handle_key(key(KeyCode::Enter)).propagation, KeyPropagation::Continue);
        assert_eq!(popover.handle_key(key(KeyCode::Char('x'))).propagation, KeyPropagation::Continue);
    }
}
