//! The date picker's quick select button and popover.
//!
//! The button is drawn inline by the date-picker page; the popover is an
//! overlay anchored under it and listing, top to bottom, the quick select
//! editor, commonly and recently used ranges, custom panels and the refresh
//! interval control.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use guidekit_types::Effect;
use guidekit_util::pretty_duration;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use super::{QuickSelectEntry, QuickSelectState};
use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};
use crate::ui::utils::{anchored_rect, truncate_to_width};

const POPOVER_WIDTH: u16 = 62;
const PRESET_COLUMNS: usize = 2;

enum PopoverRow {
    Heading(String),
    Note(String),
    Entries(Vec<(QuickSelectEntry, String)>),
}

#[derive(Debug, Default)]
pub struct QuickSelectComponent;

impl QuickSelectComponent {
    /// Draws the toggle button and the currently applied range.
    pub fn render_button(&self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let state = &app.quick_select;
        let props = &state.props;
        let icon_style = if props.is_disabled {
            theme.text_muted_style()
        } else if state.focus.get() || state.is_open() {
            theme.selection_style()
        } else {
            theme.accent_emphasis_style()
        };
        let label = if props.is_auto_refresh_only {
            refresh_summary(state)
        } else {
            pretty_duration(&props.start, &props.end, &props.commonly_used_ranges, &props.date_format)
        };
        let line = Line::from(vec![
            Span::styled(format!(" {} ", state.button_icon()), icon_style),
            Span::raw(" "),
            Span::styled(label, theme.text_primary_style()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        app.quick_select.button_area = Rect { width: 3, ..area };
    }

    fn rows(state: &QuickSelectState) -> Vec<PopoverRow> {
        let props = &state.props;
        let mut rows = Vec::new();
        if !props.is_auto_refresh_only {
            let editor = state.editor();
            rows.push(PopoverRow::Heading("Quick select".into()));
            rows.push(PopoverRow::Entries(vec![
                (QuickSelectEntry::Tense, editor.tense.label().to_string()),
                (QuickSelectEntry::Amount, editor.amount.to_string()),
                (QuickSelectEntry::Unit, editor.unit.label(u64::from(editor.amount)).to_string()),
                (QuickSelectEntry::Apply, "Apply".into()),
            ]));
            if let Some(previous) = state.last_applied() {
                rows.push(PopoverRow::Note(format!("Previous: {previous}")));
            }

            if !props.commonly_used_ranges.is_empty() {
                rows.push(PopoverRow::Heading("Commonly used".into()));
                let presets = props.commonly_used_ranges.iter().enumerate().map(|(index, range)| {
                    let label = range
                        .label
                        .clone()
                        .unwrap_or_else(|| pretty_duration(&range.start, &range.end, &[], &props.date_format));
                    (QuickSelectEntry::Common(index), label)
                });
                push_grid(&mut rows, presets.collect());
            }

            if !props.recently_used_ranges.is_empty() {
                rows.push(PopoverRow::Heading("Recently used date ranges".into()));
                let recent = props.recently_used_ranges.iter().enumerate().map(|(index, range)| {
                    let label = pretty_duration(&range.start, &range.end, &props.commonly_used_ranges, &props.date_format);
                    (QuickSelectEntry::Recent(index), label)
                });
                rows.extend(recent.map(|entry| PopoverRow::Entries(vec![entry])));
            }

            for (panel_index, panel) in props.custom_panels.iter().enumerate() {
                rows.push(PopoverRow::Heading(panel.title.clone()));
                let choices = panel.choices().into_iter().enumerate().map(|(choice, item)| {
                    (
                        QuickSelectEntry::Custom {
                            panel: panel_index,
                            choice,
                        },
                        item.label,
                    )
                });
                rows.extend(choices.map(|entry| PopoverRow::Entries(vec![entry])));
            }
        }

        let (value, unit, paused) = state.refresh_editor();
        rows.push(PopoverRow::Heading("Refresh every".into()));
        rows.push(PopoverRow::Entries(vec![
            (QuickSelectEntry::RefreshPause, if paused { "▶ Start".into() } else { "⏸ Stop".into() }),
            (QuickSelectEntry::RefreshValue, value.to_string()),
            (QuickSelectEntry::RefreshUnit, unit.symbol().to_string()),
        ]));
        rows
    }

    fn entry_span(label: &str, width: u16, is_cursor: bool, theme: &dyn Theme) -> Span<'static> {
        let text = truncate_to_width(label, width.saturating_sub(1) as usize);
        let style = if is_cursor {
            theme.selection_style().add_modifier(Modifier::BOLD)
        } else {
            theme.text_primary_style()
        };
        Span::styled(text, style)
    }

    fn close_and_restore_focus(app: &mut App) {
        app.quick_select.close();
        app.focus.focus(&app.quick_select);
    }
}

fn push_grid(rows: &mut Vec<PopoverRow>, entries: Vec<(QuickSelectEntry, String)>) {
    let mut entries = entries.into_iter().peekable();
    while entries.peek().is_some() {
        rows.push(PopoverRow::Entries(entries.by_ref().take(PRESET_COLUMNS).collect()));
    }
}

fn refresh_summary(state: &QuickSelectState) -> String {
    let refresh = state.props.refresh;
    if refresh.is_paused || refresh.interval_ms == 0 {
        "Auto-refresh off".into()
    } else {
        format!("Refreshing every {}s", refresh.interval_ms / 1_000)
    }
}

impl Component for QuickSelectComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let state = &mut app.quick_select;
        if !state.is_open() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                state.toggle();
            }
            return Vec::new();
        }
        let Some(entry) = state.cursor_entry() else {
            if key.code == KeyCode::Esc {
                Self::close_and_restore_focus(app);
            }
            return Vec::new();
        };
        match key.code {
            KeyCode::Esc => {
                Self::close_and_restore_focus(app);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Tab => {
                state.move_cursor(1);
                Vec::new()
            }
            KeyCode::Up | KeyCode::BackTab => {
                state.move_cursor(-1);
                Vec::new()
            }
            KeyCode::Left => state.adjust(entry, false),
            KeyCode::Right => state.adjust(entry, true),
            KeyCode::Backspace => state.pop_digit(entry),
            KeyCode::Char(c) if c.is_ascii_digit() => state.push_digit(entry, c.to_digit(10).unwrap_or_default()),
            KeyCode::Enter | KeyCode::Char(' ') => state.activate(entry),
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(mouse.column, mouse.row);
        let state = &mut app.quick_select;
        if state.button_area.contains(position) {
            state.toggle();
            app.focus.focus(&app.quick_select);
            return Vec::new();
        }
        if !state.is_open() {
            return Vec::new();
        }
        if !state.last_area.contains(position) {
            state.close();
            return Vec::new();
        }
        let hit = state.entry_areas.iter().find(|(_, area)| area.contains(position)).map(|(entry, _)| *entry);
        match hit {
            Some(entry) => {
                state.set_cursor_entry(entry);
                state.activate(entry)
            }
            None => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, bounds: Rect, app: &mut App) {
        if !app.quick_select.is_open() {
            return;
        }
        let rows = Self::rows(&app.quick_select);
        let anchor = app.quick_select.button_area;
        let area = anchored_rect(anchor, POPOVER_WIDTH, rows.len() as u16 + 2, bounds);

        let theme = &*app.ctx.theme;
        let block = th::popover_block(theme, Some("Date range"));
        let inner = block.inner(area);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        let cursor_entry = app.quick_select.cursor_entry();
        let mut entry_areas = Vec::new();
        for (index, row) in rows.iter().enumerate().take(inner.height as usize) {
            let line_area = Rect::new(inner.x, inner.y + index as u16, inner.width, 1);
            match row {
                PopoverRow::Heading(title) => {
                    let heading = Span::styled(title.as_str(), theme.text_secondary_style().add_modifier(Modifier::BOLD));
                    frame.render_widget(Paragraph::new(heading), line_area);
                }
                PopoverRow::Note(note) => {
                    frame.render_widget(Paragraph::new(Span::styled(note.as_str(), theme.text_muted_style())), line_area);
                }
                PopoverRow::Entries(entries) => {
                    let constraints = entries.iter().map(|_| Constraint::Ratio(1, entries.len() as u32));
                    let cells = Layout::horizontal(constraints).split(line_area);
                    for ((entry, label), cell) in entries.iter().zip(cells.iter()) {
                        let span = Self::entry_span(label, cell.width, cursor_entry == Some(*entry), theme);
                        frame.render_widget(Paragraph::new(span), *cell);
                        entry_areas.push((*entry, *cell));
                    }
                }
            }
        }

        app.quick_select.last_area = area;
        app.quick_select.entry_areas = entry_areas;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let hints: &[(&str, &str)] = if app.quick_select.is_open() {
            &[(" ↑/↓", " Move  "), ("←/→", " Change  "), ("Enter", " Apply  "), ("Esc", " Close  ")]
        } else {
            &[(" Enter", " Open quick select  ")]
        };
        th::build_hint_spans(&*app.ctx.theme, hints)
    }
}
