//! Detail popover for a data-grid cell.
//!
//! Shows the column's popover content for the originating cell and, when the
//! column defines cell actions, a footer with one button per action. The
//! popover is an overlay: it renders last and sees keys before any pane.

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use guidekit_types::Effect;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use tracing::debug;

use super::{KeyPropagation, PopoverKeyResult};
use crate::app::App;
use crate::ui::components::component::{Component, find_target_index_by_mouse_position};
use crate::ui::components::data_grid::CellPosition;
use crate::ui::theme::theme_helpers as th;
use crate::ui::utils::anchored_rect;

const POPOVER_WIDTH: u16 = 44;
const MAX_CONTENT_ROWS: u16 = 12;

#[derive(Debug, Default)]
pub struct CellPopoverComponent;

impl CellPopoverComponent {
    /// Routes a key through the open popover and reports whether it was
    /// consumed.
    pub fn route_key(&mut self, app: &mut App, key: KeyEvent) -> (KeyPropagation, Vec<Effect>) {
        let result = app.cell_popover.handle_key(key);
        let effects = self.apply_result(app, result);
        (result.propagation, effects)
    }

    fn apply_result(&self, app: &mut App, result: PopoverKeyResult) -> Vec<Effect> {
        if let Some(origin) = result.dismissed_from {
            return_focus_to_cell(app, origin);
        }
        match (result.run_action, app.cell_popover.origin()) {
            (Some(index), Some(origin)) => run_action(app, origin, index).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    fn content_lines(app: &App, origin: CellPosition, width: u16) -> Vec<String> {
        let wrap_width = width.saturating_sub(4).max(8) as usize;
        app.data_grid
            .popover_content(origin)
            .iter()
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    textwrap::wrap(line, wrap_width).into_iter().map(|l| l.into_owned()).collect()
                }
            })
            .collect()
    }
}

/// Moves focus back to the cell the popover was opened from.
pub(crate) fn return_focus_to_cell(app: &mut App, origin: CellPosition) {
    debug!(row = origin.row, column = origin.column, "cell popover dismissed");
    app.data_grid.update_focus(origin);
    app.focus.focus(&app.data_grid);
}

fn run_action(app: &App, origin: CellPosition, index: usize) -> Option<Effect> {
    let action = app.data_grid.cell_actions(origin).get(index)?;
    let context = app.data_grid.action_context(origin, true)?;
    debug!(action = action.id.as_str(), row = context.row_index, column = context.column_id.as_str(), "running cell action");
    Some(action.run(&context))
}

impl Component for CellPopoverComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        self.route_key(app, key).1
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if !app.cell_popover.is_open() || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let popover = &app.cell_popover;
        if !popover.last_area.contains(Position::new(mouse.column, mouse.row)) {
            if let Some(origin) = app.cell_popover.close() {
                return_focus_to_cell(app, origin);
            }
            return Vec::new();
        }
        let hit = find_target_index_by_mouse_position(&popover.last_area, &popover.action_areas, mouse.column, mouse.row);
        match (hit, popover.origin()) {
            (Some(index), Some(origin)) => run_action(app, origin, index).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, bounds: Rect, app: &mut App) {
        let Some(origin) = app.cell_popover.origin() else {
            return;
        };
        let anchor = app.data_grid.cell_area(origin).unwrap_or(app.data_grid.last_area);
        let lines = Self::content_lines(app, origin, POPOVER_WIDTH);
        let actions = app.data_grid.cell_actions(origin);
        let footer_rows: u16 = if actions.is_empty() { 0 } else { 2 };
        let content_rows = (lines.len() as u16).clamp(1, MAX_CONTENT_ROWS);
        let area = anchored_rect(anchor, POPOVER_WIDTH, content_rows + footer_rows + 2, bounds);

        let theme = &*app.ctx.theme;
        let title = app.data_grid.column(origin).map(|column| column.display.as_str());
        let block = th::popover_block(theme, title);
        let inner = block.inner(area);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(footer_rows)]).split(inner);
        let body: Vec<Line> = lines.into_iter().map(|line| Line::from(Span::styled(line, theme.text_primary_style()))).collect();
        frame.render_widget(Paragraph::new(body), layout[0]);

        let mut action_areas = Vec::with_capacity(actions.len());
        if !actions.is_empty() {
            let footer = Rect {
                y: layout[1].y + 1,
                height: 1,
                ..layout[1]
            };
            let constraints = actions.iter().map(|action| Constraint::Length(action.label.chars().count() as u16 + 2));
            let button_areas = Layout::horizontal(constraints).spacing(1).split(footer);
            let focused = app.cell_popover.focused_action();
            for (index, (action, button_area)) in actions.iter().zip(button_areas.iter()).enumerate() {
                th::render_inline_button(frame, *button_area, &action.label, index == focused, theme);
                action_areas.push(*button_area);
            }
        }

        app.cell_popover.last_area = area;
        app.cell_popover.action_areas = action_areas;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let has_actions = app
            .cell_popover
            .origin()
            .is_some_and(|origin| !app.data_grid.cell_actions(origin).is_empty());
        let hints: &[(&str, &str)] = if has_actions {
            &[(" ←/→", " Action  "), ("Enter", " Run  "), ("F2/Esc", " Close  ")]
        } else {
            &[(" F2/Esc", " Close  ")]
        };
        th::build_hint_spans(&*app.ctx.theme, hints)
    }
}
