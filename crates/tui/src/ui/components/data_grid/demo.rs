//! Sample data and columns for the data-grid page.

use guidekit_types::{Effect, Severity};
use serde_json::{Value, json};
use tracing::warn;

use super::state::{CellAction, CellActionContext, CellValueContext, DataGridState, GridColumn, GridRow};

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn copy_action() -> CellAction {
    CellAction::new("copy", "Copy", |ctx: &CellActionContext| Effect::CopyToClipboardRequested(value_text(&ctx.value)))
}

fn filter_action() -> CellAction {
    CellAction::new("filter", "Filter", |ctx: &CellActionContext| {
        Effect::Status(
            Severity::Info,
            format!("Filter {} = {} (row {})", ctx.column_id, value_text(&ctx.value), ctx.row_index + 1),
        )
    })
}

/// The grid's cell renderer: compact in cells, expanded in the popover.
pub fn render_cell_value(context: &CellValueContext<'_>) -> String {
    match (context.column_id, context.value) {
        ("amount", Value::Number(amount)) => amount.as_f64().map(|a| format!("${a:.2}")).unwrap_or_else(|| amount.to_string()),
        (_, Value::Array(values)) if context.is_details => values.iter().map(|v| format!("• {}", value_text(v))).collect::<Vec<_>>().join("\n"),
        (_, Value::Array(values)) => values.iter().map(value_text).collect::<Vec<_>>().join(", "),
        (_, Value::Object(_)) if context.is_details => serde_json::to_string_pretty(context.value).unwrap_or_default(),
        (_, Value::Null) => "—".to_string(),
        (_, value) => value_text(value),
    }
}

pub fn demo_columns() -> Vec<GridColumn> {
    vec![
        GridColumn::new("name", "Name", 18).with_actions(vec![copy_action(), filter_action()]),
        GridColumn::new("email", "Email", 26)
            .with_actions(vec![copy_action()])
            .with_popover_content(|ctx, rendered| vec![format!("Contact for row {}", ctx.row_index + 1), String::new(), rendered]),
        GridColumn::new("status", "Status", 10).with_actions(vec![filter_action()]),
        GridColumn::new("amount", "Amount", 12),
        GridColumn::new("tags", "Tags", 24),
    ]
}

pub fn demo_rows() -> Vec<GridRow> {
    let rows = json!([
        {"name": "Ada Lovelace", "email": "ada@example.com", "status": "active", "amount": 1240.5, "tags": ["analyst", "early adopter"]},
        {"name": "Grace Hopper", "email": "grace@example.com", "status": "active", "amount": 980, "tags": ["compiler", "navy"]},
        {"name": "Alan Turing", "email": "alan@example.com", "status": "paused", "amount": 0, "tags": []},
        {"name": "Katherine Johnson", "email": "katherine@example.com", "status": "active", "amount": 3120.75, "tags": ["orbital", "nasa"]},
        {"name": "Edsger Dijkstra", "email": null, "status": "invited", "amount": 15.25, "tags": ["shortest path"]},
        {"name": "Barbara Liskov", "email": "barbara@example.com", "status": "active", "amount": 640, "tags": ["substitution", "clu", "argus"]},
    ]);
    match serde_json::from_value(rows) {
        Ok(rows) => rows,
        Err(error) => {
            warn!(%error, "demo grid rows failed to deserialize");
            Vec::new()
        }
    }
}

pub fn demo_grid() -> DataGridState {
    DataGridState::new(demo_columns(), demo_rows(), render_cell_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::data_grid::CellPosition;

    #[test]
    fn demo_renders_compact_and_detailed_values() {
        let grid = demo_grid();
        assert_eq!(grid.rows().len(), 6);
        assert_eq!(grid.render_cell(CellPosition::new(0, 3), false).as_deref(), Some("$1240.50"));
        assert_eq!(grid.render_cell(CellPosition::new(0, 4), false).as_deref(), Some("analyst, early adopter"));
        assert_eq!(grid.popover_content(CellPosition::new(0, 4)), vec!["• analyst", "• early adopter"]);
        assert_eq!(grid.popover_content(CellPosition::new(1, 1))[0], "Contact for row 2");
    }

    #[test]
    fn copy_action_copies_plain_text() {
        let grid = demo_grid();
        let position = CellPosition::new(0, 0);
        let context = grid.action_context(position, true).unwrap();
        let effect = grid.cell_actions(position)[0].run(&context);
        assert_eq!(effect, Effect::CopyToClipboardRequested("Ada Lovelace".into()));
    }
}
