use std::fmt;
use std::sync::Arc;

use guidekit_types::Effect;
use indexmap::IndexMap;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use serde_json::Value;

/// A grid row keyed by column id.
pub type GridRow = IndexMap<String, Value>;

/// Everything a cell action needs to know about the cell it runs on.
#[derive(Debug, Clone, PartialEq)]
pub struct CellActionContext {
    pub row_index: usize,
    pub column_id: String,
    pub value: Value,
    /// True when the action runs from the expanded cell popover.
    pub is_expanded: bool,
}

pub type CellActionFn = Arc<dyn Fn(&CellActionContext) -> Effect + Send + Sync>;

/// A per-column action shown in the cell popover footer.
#[derive(Clone)]
pub struct CellAction {
    pub id: String,
    pub label: String,
    run: CellActionFn,
}

impl CellAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>, run: impl Fn(&CellActionContext) -> Effect + Send + Sync + 'static) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            run: Arc::new(run),
        }
    }

    pub fn run(&self, context: &CellActionContext) -> Effect {
        (self.run)(context)
    }
}

impl fmt::Debug for CellAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellAction").field("id", &self.id).field("label", &self.label).finish()
    }
}

/// Inputs to the grid's cell renderer.
#[derive(Debug, Clone, Copy)]
pub struct CellValueContext<'a> {
    pub row_index: usize,
    pub column_id: &'a str,
    pub value: &'a Value,
    /// Rendering for the popover instead of the cell.
    pub is_details: bool,
}

pub type RenderCellValueFn = Arc<dyn Fn(&CellValueContext<'_>) -> String + Send + Sync>;
/// Wraps the rendered cell value into the popover's detail lines.
pub type PopoverContentFn = Arc<dyn Fn(&CellValueContext<'_>, String) -> Vec<String> + Send + Sync>;

#[derive(Clone)]
pub struct GridColumn {
    pub id: String,
    pub display: String,
    pub width: u16,
    pub cell_actions: Vec<CellAction>,
    pub popover_content: Option<PopoverContentFn>,
}

impl GridColumn {
    pub fn new(id: impl Into<String>, display: impl Into<String>, width: u16) -> Self {
        Self {
            id: id.into(),
            display: display.into(),
            width,
            cell_actions: Vec::new(),
            popover_content: None,
        }
    }

    pub fn with_actions(mut self, actions: Vec<CellAction>) -> Self {
        self.cell_actions = actions;
        self
    }

    pub fn with_popover_content(mut self, content: impl Fn(&CellValueContext<'_>, String) -> Vec<String> + Send + Sync + 'static) -> Self {
        self.popover_content = Some(Arc::new(content));
        self
    }
}

impl fmt::Debug for GridColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridColumn")
            .field("id", &self.id)
            .field("display", &self.display)
            .field("width", &self.width)
            .field("cell_actions", &self.cell_actions)
            .field("popover_content", &self.popover_content.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub column: usize,
}

impl CellPosition {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// State for the demo data grid: columns, rows, the focused cell and the
/// areas of the cells drawn on the last frame.
pub struct DataGridState {
    columns: Vec<GridColumn>,
    rows: Vec<GridRow>,
    render_cell_value: RenderCellValueFn,
    focused_cell: CellPosition,
    row_offset: usize,
    viewport_rows: usize,

    pub container_focus: FocusFlag,
    pub last_area: Rect,
    /// Cells rendered on the last frame and where.
    pub cell_areas: Vec<(CellPosition, Rect)>,
}

impl fmt::Debug for DataGridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataGridState")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("focused_cell", &self.focused_cell)
            .finish_non_exhaustive()
    }
}

impl DataGridState {
    pub fn new(
        columns: Vec<GridColumn>,
        rows: Vec<GridRow>,
        render_cell_value: impl Fn(&CellValueContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            columns,
            rows,
            render_cell_value: Arc::new(render_cell_value),
            focused_cell: CellPosition::default(),
            row_offset: 0,
            viewport_rows: 0,
            container_focus: FocusFlag::named("data_grid"),
            last_area: Rect::default(),
            cell_areas: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn focused_cell(&self) -> CellPosition {
        self.focused_cell
    }

    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows;
        self.keep_focused_row_visible();
    }

    pub fn move_focus(&mut self, row_delta: isize, column_delta: isize) {
        if self.rows.is_empty() || self.columns.is_empty() {
            return;
        }
        let row = (self.focused_cell.row as isize + row_delta).clamp(0, self.rows.len() as isize - 1);
        let column = (self.focused_cell.column as isize + column_delta).clamp(0, self.columns.len() as isize - 1);
        self.focused_cell = CellPosition::new(row as usize, column as usize);
        self.keep_focused_row_visible();
    }

    /// Moves the grid's cell focus to `position`. Used to return focus to the
    /// cell a popover was opened from.
    pub fn update_focus(&mut self, position: CellPosition) {
        if position.row < self.rows.len() && position.column < self.columns.len() {
            self.focused_cell = position;
            self.keep_focused_row_visible();
        }
    }

    fn keep_focused_row_visible(&mut self) {
        let row = self.focused_cell.row;
        if row < self.row_offset {
            self.row_offset = row;
        } else if self.viewport_rows > 0 && row >= self.row_offset + self.viewport_rows {
            self.row_offset = row + 1 - self.viewport_rows;
        }
    }

    pub fn column(&self, position: CellPosition) -> Option<&GridColumn> {
        self.columns.get(position.column)
    }

    pub fn cell_value(&self, position: CellPosition) -> Option<&Value> {
        let column = self.column(position)?;
        self.rows.get(position.row)?.get(&column.id)
    }

    /// Text for a cell, via the grid's renderer. Missing values render as null.
    pub fn render_cell(&self, position: CellPosition, is_details: bool) -> Option<String> {
        let column = self.column(position)?;
        let row = self.rows.get(position.row)?;
        let value = row.get(&column.id).unwrap_or(&Value::Null);
        Some((self.render_cell_value)(&CellValueContext {
            row_index: position.row,
            column_id: &column.id,
            value,
            is_details,
        }))
    }

    /// Detail lines for the popover: the column's popover content wrapped
    /// around the details rendering of the cell.
    pub fn popover_content(&self, position: CellPosition) -> Vec<String> {
        let Some(column) = self.column(position) else {
            return Vec::new();
        };
        let Some(rendered) = self.render_cell(position, true) else {
            return Vec::new();
        };
        match &column.popover_content {
            Some(content) => {
                let value = self.cell_value(position).unwrap_or(&Value::Null);
                let context = CellValueContext {
                    row_index: position.row,
                    column_id: &column.id,
                    value,
                    is_details: true,
                };
                content(&context, rendered)
            }
            None => rendered.lines().map(str::to_string).collect(),
        }
    }

    pub fn cell_actions(&self, position: CellPosition) -> &[CellAction] {
        self.column(position).map(|column| column.cell_actions.as_slice()).unwrap_or_default()
    }

    pub fn action_context(&self, position: CellPosition, is_expanded: bool) -> Option<CellActionContext> {
        let column = self.column(position)?;
        Some(CellActionContext {
            row_index: position.row,
            column_id: column.id.clone(),
            value: self.cell_value(position).cloned().unwrap_or(Value::Null),
            is_expanded,
        })
    }

    pub fn cell_area(&self, position: CellPosition) -> Option<Rect> {
        self.cell_areas.iter().find(|(cell, _)| *cell == position).map(|(_, area)| *area)
    }

    pub fn cell_at(&self, x: u16, y: u16) -> Option<CellPosition> {
        let point = ratatui::layout::Position { x, y };
        self.cell_areas.iter().find(|(_, area)| area.contains(point)).map(|(cell, _)| *cell)
    }
}

impl HasFocus for DataGridState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guidekit_types::Severity;
    use serde_json::json;

    fn grid() -> DataGridState {
        let columns = vec![
            GridColumn::new("name", "Name", 12).with_actions(vec![CellAction::new("filter", "Filter", |ctx| {
                Effect::Status(Severity::Info, format!("{}:{}", ctx.column_id, ctx.value))
            })]),
            GridColumn::new("tags", "Tags", 12).with_popover_content(|ctx, rendered| {
                let mut lines = vec![format!("row {}", ctx.row_index)];
                lines.extend(rendered.lines().map(str::to_string));
                lines
            }),
        ];
        let rows: Vec<GridRow> = vec![
            serde_json::from_value(json!({"name": "ada", "tags": ["a", "b"]})).unwrap(),
            serde_json::from_value(json!({"name": "grace"})).unwrap(),
        ];
        DataGridState::new(columns, rows, |ctx| match ctx.value {
            Value::Array(values) if ctx.is_details => values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("\n"),
            Value::Array(values) => format!("{} tags", values.len()),
            Value::String(s) => s.clone(),
            Value::Null => "-".into(),
            other => other.to_string(),
        })
    }

    #[test]
    fn popover_content_wraps_details_rendering() {
        let grid = grid();
        assert_eq!(grid.render_cell(CellPosition::new(0, 1), false).as_deref(), Some("2 tags"));
        assert_eq!(grid.popover_content(CellPosition::new(0, 1)), vec!["row 0", "\"a\"", "\"b\""]);
        assert_eq!(grid.popover_content(CellPosition::new(1, 0)), vec!["grace"]);
        assert_eq!(grid.render_cell(CellPosition::new(1, 1), false).as_deref(), Some("-"));
    }

    #[test]
    fn actions_receive_cell_context() {
        let grid = grid();
        let position = CellPosition::new(1, 0);
        let context = grid.action_context(position, true).unwrap();
        assert!(context.is_expanded);
        assert_eq!(context.row_index, 1);
        let effect = grid.cell_actions(position)[0].run(&context);
        assert_eq!(effect, Effect::Status(Severity::Info, "name:\"grace\"".into()));
        assert!(grid.cell_actions(CellPosition::new(0, 1)).is_empty());
    }

    #[test]
    fn focus_moves_within_bounds() {
        let mut grid = grid();
        grid.move_focus(5, 5);
        assert_eq!(grid.focused_cell(), CellPosition::new(1, 1));
        grid.update_focus(CellPosition::new(9, 0));
        assert_eq!(grid.focused_cell(), CellPosition::new(1, 1));
        grid.update_focus(CellPosition::new(0, 0));
        assert_eq!(grid.focused_cell(), CellPosition::new(0, 0));
    }
}
