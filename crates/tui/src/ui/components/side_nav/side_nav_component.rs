//! Side navigation for the guide: a search field over a filtered tree of
//! sections, pages and page sub-sections.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use guidekit_types::Effect;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{HighlightedText, NavRow, SideNavState};
use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};

const NEW_BADGE: &str = " NEW ";

#[derive(Debug, Default)]
pub struct SideNavComponent;

impl SideNavComponent {
    fn handle_search_keys(&self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let state = &mut app.side_nav;
        match key.code {
            KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => state.insert_search_char(c),
            KeyCode::Backspace => state.remove_search_char(),
            KeyCode::Delete => state.delete_search_char(),
            KeyCode::Left => state.move_search_cursor_left(),
            KeyCode::Right => state.move_search_cursor_right(),
            KeyCode::Home => state.move_search_cursor_home(),
            KeyCode::End => state.move_search_cursor_end(),
            KeyCode::Esc => state.clear_search(),
            KeyCode::Down => {
                app.focus.focus(&app.side_nav.f_list);
            }
            KeyCode::Enter => return app.side_nav.activate(Instant::now()),
            _ => {}
        }
        Vec::new()
    }

    fn handle_list_keys(&self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let state = &mut app.side_nav;
        match key.code {
            KeyCode::Up if state.cursor() == 0 => {
                app.focus.focus(&app.side_nav.f_search);
            }
            KeyCode::Up => state.move_cursor(-1),
            KeyCode::Down => state.move_cursor(1),
            KeyCode::PageUp => state.move_cursor(-10),
            KeyCode::PageDown => state.move_cursor(10),
            KeyCode::Enter | KeyCode::Char(' ') => return state.activate(Instant::now()),
            KeyCode::Char('/') => {
                app.focus.focus(&app.side_nav.f_search);
            }
            KeyCode::Esc => state.clear_search(),
            _ => {}
        }
        Vec::new()
    }

    fn row_line<'a>(&self, state: &'a SideNavState, row: &NavRow, is_cursor: bool, theme: &dyn Theme) -> Line<'a> {
        let mut spans = Vec::new();
        match row {
            NavRow::Section { .. } => {
                if let Some(section) = state.section_at(row) {
                    spans.push(Span::styled(section.name.as_str(), theme.accent_emphasis_style()));
                }
            }
            NavRow::Item { .. } => {
                if let Some(item) = state.item_at(row) {
                    let base = if item.is_selected {
                        theme.text_primary_style().add_modifier(Modifier::BOLD)
                    } else {
                        theme.text_secondary_style()
                    };
                    let marker = if item.is_selected { "▸ " } else { "  " };
                    spans.push(Span::styled(marker, theme.accent_emphasis_style()));
                    spans.extend(highlight_spans(&item.label, base, theme.search_highlight_style()));
                    if item.is_new {
                        spans.push(Span::raw(" "));
                        spans.push(Span::styled(NEW_BADGE, theme.badge_style()));
                    }
                }
            }
            NavRow::SubItem { .. } => {
                if let Some(sub) = state.sub_item_at(row) {
                    spans.push(Span::styled("    · ", theme.text_muted_style()));
                    spans.extend(highlight_spans(&sub.label, theme.text_muted_style(), theme.search_highlight_style()));
                }
            }
        }
        let line = Line::from(spans);
        if is_cursor { line.style(theme.selection_style()) } else { line }
    }

    fn render_search(&self, frame: &mut Frame, app: &mut App, area: Rect) {
        let theme = &*app.ctx.theme;
        let state = &app.side_nav;
        let is_focused = state.f_search.get();
        let content = if state.search().is_empty() && !is_focused {
            Line::from(vec![Span::styled("⌕ ", theme.text_muted_style()), Span::styled("Search", theme.text_muted_style())])
        } else {
            Line::from(vec![
                Span::styled("⌕ ", theme.accent_emphasis_style()),
                Span::styled(state.search_term().to_string(), theme.text_primary_style()),
            ])
        };
        let style = if is_focused {
            theme.text_primary_style().add_modifier(Modifier::UNDERLINED)
        } else {
            theme.text_primary_style()
        };
        frame.render_widget(Paragraph::new(content).style(style), area);
        if is_focused {
            let x = area.x.saturating_add(2).saturating_add(state.search().cursor_column() as u16);
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        }
        app.side_nav.search_area = area;
    }

    fn render_list(&self, frame: &mut Frame, app: &mut App, area: Rect) {
        app.side_nav.set_viewport_rows(area.height as usize);
        app.side_nav.list_area = area;
        let theme = &*app.ctx.theme;
        let state = &app.side_nav;

        if state.rows().is_empty() {
            let message = Paragraph::new(Line::from(Span::styled("No matches", theme.text_muted_style())));
            frame.render_widget(message, area);
            return;
        }

        let show_cursor = state.f_list.get();
        let lines: Vec<Line> = state
            .rows()
            .iter()
            .enumerate()
            .skip(state.scroll_offset())
            .take(area.height as usize)
            .map(|(index, row)| self.row_line(state, row, show_cursor && index == state.cursor(), theme))
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }
}

/// Splits a label into plain and highlighted spans.
fn highlight_spans<'a>(text: &'a HighlightedText, base: Style, highlight: Style) -> Vec<Span<'a>> {
    let (before, matched, after) = text.segments();
    let mut spans = Vec::with_capacity(3);
    if !before.is_empty() {
        spans.push(Span::styled(before, base));
    }
    if !matched.is_empty() {
        spans.push(Span::styled(matched, highlight));
    }
    if !after.is_empty() {
        spans.push(Span::styled(after, base));
    }
    spans
}

impl Component for SideNavComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.side_nav.f_search.get() {
            self.handle_search_keys(app, key)
        } else if app.side_nav.f_list.get() {
            self.handle_list_keys(app, key)
        } else {
            Vec::new()
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let position = Position::new(mouse.column, mouse.row);
        let state = &app.side_nav;
        if !state.is_mounted() || !state.last_area.contains(position) {
            return Vec::new();
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if state.search_area.contains(position) {
                    app.focus.focus(&app.side_nav.f_search);
                    return Vec::new();
                }
                if state.list_area.contains(position) {
                    let index = (mouse.row - state.list_area.y) as usize + state.scroll_offset();
                    app.focus.focus(&app.side_nav.f_list);
                    app.side_nav.set_cursor(index);
                    if app.side_nav.cursor() == index {
                        return app.side_nav.activate(Instant::now());
                    }
                }
            }
            MouseEventKind::ScrollDown => app.side_nav.scroll_by(1),
            MouseEventKind::ScrollUp => app.side_nav.scroll_by(-1),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let is_focused = app.side_nav.f_search.get() || app.side_nav.f_list.get();
        let block = th::block(&*app.ctx.theme, Some("Guide"), is_focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        app.side_nav.last_area = area;

        let layout = self.get_preferred_layout(app, inner);
        self.render_search(frame, app, layout[0]);
        self.render_list(frame, app, layout[2]);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let hints: &[(&str, &str)] = if app.side_nav.f_search.get() {
            &[(" Type", " Filter  "), ("Esc", " Clear  "), ("↓", " Results  ")]
        } else {
            &[(" ↑/↓", " Navigate  "), ("Enter", " Open  "), ("/", " Search  ")]
        };
        th::build_hint_spans(&*app.ctx.theme, hints)
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Length(1), // search
            Constraint::Length(1), // spacer
            Constraint::Min(0),    // tree
        ])
        .split(area)
        .to_vec()
    }
}
