//! The guide page: title, summary, the page's live demo and its sub-sections.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use guidekit_types::Effect;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::{PageDemo, ResolvedPage};
use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::components::data_grid::DataGridComponent;
use crate::ui::components::quick_select::QuickSelectComponent;
use crate::ui::theme::{Theme, theme_helpers as th};

const DATE_PICKER_DEMO_ROWS: u16 = 5;
const DATA_GRID_DEMO_ROWS: u16 = 10;

#[derive(Debug, Default)]
pub struct GuidePageComponent {
    data_grid: DataGridComponent,
    quick_select: QuickSelectComponent,
}

impl GuidePageComponent {
    /// Lays out the sub-sections as wrapped text and reports the content row
    /// of each heading.
    fn section_lines(page: &ResolvedPage, width: u16, theme: &dyn Theme) -> (Vec<Line<'static>>, Vec<(String, usize)>) {
        let wrap_width = width.max(10) as usize;
        let mut lines = Vec::new();
        let mut headings = Vec::new();
        for section in &page.item.sections {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            headings.push((section.id.clone(), lines.len()));
            let title = section.title().unwrap_or(section.id.as_str());
            lines.push(Line::from(vec![
                Span::styled("§ ", theme.accent_emphasis_style()),
                Span::styled(title.to_string(), theme.text_primary_style().add_modifier(Modifier::BOLD)),
                Span::styled(format!("  #{}", section.id), theme.text_muted_style()),
            ]));
            if let Some(body) = section.body.as_deref() {
                for paragraph in body.split("\n\n") {
                    for wrapped in textwrap::wrap(paragraph.trim(), wrap_width) {
                        lines.push(Line::from(Span::styled(wrapped.into_owned(), theme.text_secondary_style())));
                    }
                }
            }
        }
        (lines, headings)
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let page = &app.guide_page;
        let mut lines = Vec::new();
        match page.page() {
            Some(resolved) => {
                let mut title = vec![
                    Span::styled(resolved.section_name.clone(), theme.text_muted_style()),
                    Span::styled(" / ", theme.text_muted_style()),
                    Span::styled(resolved.item.name.clone(), theme.accent_emphasis_style()),
                ];
                if resolved.item.is_new {
                    title.push(Span::raw(" "));
                    title.push(Span::styled(" NEW ", theme.badge_style()));
                }
                lines.push(Line::from(title));
                if let Some(summary) = resolved.item.summary.as_deref() {
                    lines.push(Line::from(Span::styled(summary.to_string(), theme.text_secondary_style())));
                }
            }
            None => {
                lines.push(Line::from(Span::styled("Page not found", theme.status_warning())));
                lines.push(Line::from(Span::styled(
                    format!("Nothing in the guide lives at {}", page.route()),
                    theme.text_muted_style(),
                )));
            }
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }

    fn render_date_picker_demo(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let block = th::block(&*app.ctx.theme, Some("Super date picker"), app.quick_select.focus.get());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)]).split(inner);
        self.quick_select.render_button(frame, rows[0], app);

        let theme = &*app.ctx.theme;
        let props = &app.quick_select.props;
        let applied = Line::from(vec![
            Span::styled("start ", theme.text_muted_style()),
            Span::styled(props.start.clone(), theme.text_primary_style()),
            Span::styled("  end ", theme.text_muted_style()),
            Span::styled(props.end.clone(), theme.text_primary_style()),
        ]);
        frame.render_widget(Paragraph::new(applied), rows[1]);
        let refresh = if props.refresh.is_paused {
            "auto-refresh paused".to_string()
        } else {
            format!("auto-refresh every {} ms", props.refresh.interval_ms)
        };
        frame.render_widget(Paragraph::new(Span::styled(refresh, theme.text_muted_style())), rows[2]);
    }
}

impl Component for GuidePageComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.data_grid.container_focus.get() {
            return self.data_grid.handle_key_events(app, key);
        }
        if app.quick_select.focus.get() {
            return self.quick_select.handle_key_events(app, key);
        }
        let page = &mut app.guide_page;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => page.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => page.scroll_by(1),
            KeyCode::PageUp => page.scroll_by(-page.page_rows()),
            KeyCode::PageDown => page.scroll_by(page.page_rows()),
            KeyCode::Home => page.scroll_to_top(),
            KeyCode::End => page.scroll_to_bottom(),
            KeyCode::Char('q') if page.demo() == PageDemo::DatePicker => {
                app.quick_select.toggle();
                app.focus.focus(&app.quick_select);
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let position = Position::new(mouse.column, mouse.row);
        if !app.guide_page.last_area.contains(position) {
            return Vec::new();
        }
        match app.guide_page.demo() {
            PageDemo::DataGrid if app.data_grid.last_area.contains(position) => {
                return self.data_grid.handle_mouse_events(app, mouse);
            }
            PageDemo::DatePicker if app.quick_select.button_area.contains(position) => {
                return self.quick_select.handle_mouse_events(app, mouse);
            }
            _ => {}
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => app.guide_page.scroll_by(1),
            MouseEventKind::ScrollUp => app.guide_page.scroll_by(-1),
            MouseEventKind::Down(_) => {
                app.focus.focus(&app.guide_page);
            }
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let is_focused = app.guide_page.focus.get();
        let block = th::block(&*app.ctx.theme, Some("Guide page"), is_focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        app.guide_page.last_area = area;

        let layout = self.get_preferred_layout(app, inner);
        self.render_header(frame, layout[0], app);

        match app.guide_page.demo() {
            PageDemo::DatePicker => self.render_date_picker_demo(frame, layout[1], app),
            PageDemo::DataGrid => self.data_grid.render(frame, layout[1], app),
            PageDemo::None => {}
        }

        let body_area = layout[2];
        let theme = &*app.ctx.theme;
        let (lines, headings) = match app.guide_page.page() {
            Some(page) => Self::section_lines(page, body_area.width, theme),
            None => (Vec::new(), Vec::new()),
        };
        let content_rows = lines.len();
        app.guide_page.record_layout(headings, content_rows, body_area.height as usize);
        let offset = app.guide_page.scroll_offset();
        let visible: Vec<Line> = lines.into_iter().skip(offset).take(body_area.height as usize).collect();
        frame.render_widget(Paragraph::new(visible), body_area);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        if app.data_grid.container_focus.get() {
            return self.data_grid.get_hint_spans(app);
        }
        if app.quick_select.focus.get() {
            return self.quick_select.get_hint_spans(app);
        }
        let mut hints = vec![(" ↑/↓", " Scroll  ")];
        if app.guide_page.demo() == PageDemo::DatePicker {
            hints.push(("q", " Quick select  "));
        }
        th::build_hint_spans(&*app.ctx.theme, &hints)
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let header_rows = match app.guide_page.page() {
            Some(page) if page.item.summary.is_some() => 3,
            _ => 2,
        };
        let demo_rows = match app.guide_page.demo() {
            PageDemo::DatePicker => DATE_PICKER_DEMO_ROWS,
            PageDemo::DataGrid => DATA_GRID_DEMO_ROWS,
            PageDemo::None => 0,
        };
        Layout::vertical([
            Constraint::Length(header_rows), // title + summary
            Constraint::Length(demo_rows),   // live demo
            Constraint::Min(0),              // sub-sections
        ])
        .spacing(1)
        .split(area)
        .to_vec()
    }
}
