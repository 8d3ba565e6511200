use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use guidekit_types::Effect;
use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::CellPosition;
use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::theme_helpers as th;
use crate::ui::utils::truncate_to_width;

/// Renders the demo grid and opens the cell popover for the focused cell.
#[derive(Debug, Default)]
pub struct DataGridComponent;

impl DataGridComponent {
    fn open_popover(&self, app: &mut App, position: CellPosition) {
        let action_count = app.data_grid.cell_actions(position).len();
        app.cell_popover.open(position, action_count);
        app.rebuild_focus();
        app.focus.focus(&app.cell_popover);
    }
}

impl Component for DataGridComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let grid = &mut app.data_grid;
        match key.code {
            KeyCode::Up => grid.move_focus(-1, 0),
            KeyCode::Down => grid.move_focus(1, 0),
            KeyCode::Left => grid.move_focus(0, -1),
            KeyCode::Right => grid.move_focus(0, 1),
            KeyCode::Home => grid.move_focus(0, isize::MIN / 2),
            KeyCode::End => grid.move_focus(0, isize::MAX / 2),
            KeyCode::Enter | KeyCode::F(2) => {
                let position = grid.focused_cell();
                self.open_popover(app, position);
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        if let Some(position) = app.data_grid.cell_at(mouse.column, mouse.row) {
            let already_focused = app.data_grid.focused_cell() == position && app.data_grid.container_focus.get();
            app.data_grid.update_focus(position);
            app.focus.focus(&app.data_grid);
            if already_focused {
                self.open_popover(app, position);
            }
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let is_focused = app.data_grid.container_focus.get();
        let block = th::block(&*app.ctx.theme, Some("Data grid"), is_focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        app.data_grid.last_area = area;
        app.data_grid.set_viewport_rows(inner.height.saturating_sub(1) as usize);

        let theme = &*app.ctx.theme;
        let grid = &app.data_grid;
        let mut column_x = Vec::with_capacity(grid.columns().len());
        let mut x = inner.x;
        for column in grid.columns() {
            let width = column.width.min(inner.right().saturating_sub(x));
            column_x.push((x, width));
            x = x.saturating_add(width).saturating_add(1);
        }

        let header: Vec<Span> = grid
            .columns()
            .iter()
            .zip(&column_x)
            .flat_map(|(column, (_, width))| {
                let label = format!("{:<w$}", truncate_to_width(&column.display, *width as usize), w = *width as usize);
                [Span::styled(label, theme.text_secondary_style().add_modifier(Modifier::BOLD)), Span::raw(" ")]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(header)), Rect { height: 1, ..inner });

        let focused = grid.focused_cell();
        let popover_origin = app.cell_popover.origin();
        let mut cell_areas = Vec::new();
        let visible_rows = inner.height.saturating_sub(1) as usize;
        for (line_index, row_index) in (grid.row_offset()..grid.rows().len()).take(visible_rows).enumerate() {
            let y = inner.y + 1 + line_index as u16;
            for (column_index, (cell_x, width)) in column_x.iter().enumerate() {
                if *width == 0 {
                    continue;
                }
                let position = CellPosition::new(row_index, column_index);
                let text = grid.render_cell(position, false).unwrap_or_default();
                let text = truncate_to_width(text.lines().next().unwrap_or_default(), *width as usize);
                let style = if position == focused && (is_focused || popover_origin == Some(position)) {
                    theme.selection_style()
                } else if position == focused {
                    theme.text_primary_style().add_modifier(Modifier::UNDERLINED)
                } else {
                    theme.text_primary_style()
                };
                let cell_area = Rect::new(*cell_x, y, *width, 1);
                frame.render_widget(Paragraph::new(Span::styled(text, style)), cell_area);
                cell_areas.push((position, cell_area));
            }
        }
        app.data_grid.cell_areas = cell_areas;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(&*app.ctx.theme, &[(" ←↑↓→", " Move  "), ("Enter/F2", " Expand cell  ")])
    }
}
