use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use guidekit_types::{Effect, Msg, Severity};
use ratatui::{
    prelude::*,
    style::Style,
    widgets::Paragraph,
};
use tracing::info;

use super::components::cell_popover::KeyPropagation;
use super::components::{CellPopoverComponent, Component, GuidePageComponent, QuickSelectComponent, SideNavComponent};
use super::theme::{self, Theme, theme_helpers as th};
use crate::app::App;

const SIDE_NAV_WIDTH: u16 = 32;

/// Root view: lays out the side nav and guide page, draws the footer and
/// the overlays, and routes input between them.
#[derive(Default, Debug)]
pub struct MainView {
    side_nav_view: SideNavComponent,
    guide_page_view: GuidePageComponent,
    quick_select_view: QuickSelectComponent,
    cell_popover_view: CellPopoverComponent,
}

impl MainView {
    pub fn restore_focus(&mut self, app: &mut App) {
        if app.cell_popover.is_open() {
            app.focus.focus(&app.cell_popover);
        } else {
            app.focus.first();
        }
    }

    /// Mounts or unmounts the side nav and moves focus accordingly.
    fn toggle_side_nav(app: &mut App) {
        if app.side_nav.is_mounted() {
            app.side_nav.unmount();
            app.rebuild_focus();
            app.focus.focus(&app.guide_page);
        } else {
            app.side_nav.mount();
            app.rebuild_focus();
            app.focus.focus(&app.side_nav.f_search);
        }
        info!(mounted = app.side_nav.is_mounted(), "side nav toggled");
    }

    fn cycle_theme(app: &mut App) -> Vec<Effect> {
        let loaded = theme::next(app.ctx.theme_id);
        app.ctx.theme = loaded.theme;
        app.ctx.theme_id = loaded.id;
        vec![
            Effect::ThemeChanged(loaded.id.to_string()),
            Effect::Status(Severity::Info, format!("Theme: {}", loaded.id)),
        ]
    }

    /// Shortcuts available everywhere, including while an overlay is open.
    fn handle_global_key(app: &mut App, key: KeyEvent) -> Option<Vec<Effect>> {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('b') if control => {
                Self::toggle_side_nav(app);
                Some(Vec::new())
            }
            KeyCode::Char('t') if control => Some(Self::cycle_theme(app)),
            _ => None,
        }
    }

    fn status_line<'a>(app: &'a App, theme: &dyn Theme) -> Line<'a> {
        let Some(status) = app.status.as_ref() else {
            return Line::default();
        };
        let style = match status.severity {
            Severity::Info => theme.status_info(),
            Severity::Warning => theme.status_warning(),
            Severity::Error => theme.status_error(),
        };
        Line::from(Span::styled(format!(" {}", status.message), style))
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(&msg)
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.cell_popover.is_open() {
            let (propagation, mut effects) = self.cell_popover_view.route_key(app, key);
            if propagation == KeyPropagation::Continue
                && let Some(global) = Self::handle_global_key(app, key)
            {
                effects.extend(global);
            }
            return effects;
        }

        if app.quick_select.is_open() && !key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.quick_select_view.handle_key_events(app, key);
        }

        if let Some(effects) = Self::handle_global_key(app, key) {
            return effects;
        }

        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus.prev();
                return Vec::new();
            }
            _ => {}
        }

        if app.side_nav.is_mounted() && app.side_nav.is_focused() {
            return self.side_nav_view.handle_key_events(app, key);
        }
        self.guide_page_view.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let is_click = mouse.kind == MouseEventKind::Down(MouseButton::Left);
        if is_click && app.cell_popover.is_open() {
            return self.cell_popover_view.handle_mouse_events(app, mouse);
        }
        if is_click && app.quick_select.is_open() {
            return self.quick_select_view.handle_mouse_events(app, mouse);
        }

        let position = Position::new(mouse.column, mouse.row);
        if app.side_nav.is_mounted() && app.side_nav.last_area.contains(position) {
            return self.side_nav_view.handle_mouse_events(app, mouse);
        }
        self.guide_page_view.handle_mouse_events(app, mouse)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        // Fill the entire background with the theme's background color for consistency
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let layout = self.get_preferred_layout(app, area);
        if app.side_nav.is_mounted() {
            self.side_nav_view.render(frame, layout[0], app);
        }
        self.guide_page_view.render(frame, layout[1], app);

        let hint_spans: Vec<Span> = self.get_hint_spans(app);
        let hints_widget = Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style());
        frame.render_widget(hints_widget, layout[2]);
        frame.render_widget(Paragraph::new(Self::status_line(app, &*app.ctx.theme)), layout[3]);

        // Overlays render last so they sit above every pane.
        self.quick_select_view.render(frame, area, app);
        self.cell_popover_view.render(frame, area, app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];

        if app.cell_popover.is_open() {
            hint_spans.extend(self.cell_popover_view.get_hint_spans(app));
            return hint_spans;
        }
        if app.quick_select.is_open() {
            hint_spans.extend(self.quick_select_view.get_hint_spans(app));
            return hint_spans;
        }

        if app.side_nav.is_mounted() && app.side_nav.is_focused() {
            hint_spans.extend(self.side_nav_view.get_hint_spans(app));
        } else {
            hint_spans.extend(self.guide_page_view.get_hint_spans(app));
        }

        hint_spans.extend(th::build_hint_spans(
            &*app.ctx.theme,
            &[("Tab", " Focus  "), ("Ctrl+B", " Toggle nav  "), ("Ctrl+T", " Theme  "), ("Ctrl+C", " Quit ")],
        ));
        hint_spans
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let rows = Layout::vertical([
            Constraint::Min(1),    // panes
            Constraint::Length(1), // hints
            Constraint::Length(1), // status
        ])
        .split(area);
        let nav_width = if app.side_nav.is_mounted() { SIDE_NAV_WIDTH } else { 0 };
        let panes = Layout::horizontal([
            Constraint::Length(nav_width), // side nav
            Constraint::Min(1),            // guide page
        ])
        .split(rows[0]);

        vec![panes[0], panes[1], rows[1], rows[2]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_config;
    use crate::cmd;
    use crate::ui::components::data_grid::CellPosition;
    use ratatui::{Terminal, backend::TestBackend};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn draw(view: &mut MainView, app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("terminal");
        app.rebuild_focus();
        terminal.draw(|frame| view.render(frame, frame.area(), app)).expect("draw");
    }

    #[test]
    fn ctrl_b_toggles_the_side_nav() {
        let mut app = App::new(&test_config());
        let mut view = MainView::default();
        view.handle_key_events(&mut app, ctrl('b'));
        assert!(!app.side_nav.is_mounted());
        assert!(app.guide_page.focus.get());

        view.handle_key_events(&mut app, ctrl('b'));
        assert!(app.side_nav.is_mounted());
        assert!(app.side_nav.f_search.get());
    }

    fn hint_text(view: &MainView, app: &App) -> String {
        view.get_hint_spans(app).iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn side_nav_focus_drives_key_routing_and_hints() {
        let mut app = App::new(&test_config());
        let mut view = MainView::default();
        draw(&mut view, &mut app);

        app.focus.focus(&app.side_nav.f_search);
        assert!(app.side_nav.is_focused());
        assert!(hint_text(&view, &app).contains("Filter"));
        view.handle_key_events(&mut app, key(KeyCode::Char('b')));
        assert_eq!(app.side_nav.search_term(), "b");

        app.focus.focus(&app.guide_page);
        assert!(!app.side_nav.is_focused());
        assert!(hint_text(&view, &app).contains("Scroll"));
        view.handle_key_events(&mut app, key(KeyCode::Char('x')));
        assert_eq!(app.side_nav.search_term(), "b");
    }

    #[test]
    fn ctrl_t_cycles_theme_and_requests_persistence() {
        let mut app = App::new(&test_config());
        let mut view = MainView::default();
        let effects = view.handle_key_events(&mut app, ctrl('t'));
        assert_eq!(app.ctx.theme_id, "dracula");
        assert_eq!(effects[0], Effect::ThemeChanged("dracula".into()));
    }

    #[test]
    fn open_cell_popover_swallows_pane_keys() {
        let mut config = test_config();
        config.initial_route = Some(guidekit_types::Route::new("data-grid"));
        let mut app = App::new(&config);
        let mut view = MainView::default();
        draw(&mut view, &mut app);

        app.data_grid.update_focus(CellPosition::new(1, 0));
        app.cell_popover.open(CellPosition::new(1, 0), 2);
        app.rebuild_focus();
        app.focus.focus(&app.cell_popover);

        let before = app.guide_page.scroll_offset();
        view.handle_key_events(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.guide_page.scroll_offset(), before);
        assert!(app.cell_popover.is_open());

        view.handle_key_events(&mut app, key(KeyCode::Esc));
        assert!(!app.cell_popover.is_open());
        assert_eq!(app.data_grid.focused_cell(), CellPosition::new(1, 0));
        assert!(app.data_grid.container_focus.get());
    }

    #[test]
    fn enter_on_search_navigates_and_renders_the_page() {
        let mut app = App::new(&test_config());
        let mut view = MainView::default();
        draw(&mut view, &mut app);
        app.focus.focus(&app.side_nav.f_search);

        for c in "grid".chars() {
            view.handle_key_events(&mut app, key(KeyCode::Char(c)));
        }
        let effects = view.handle_key_events(&mut app, key(KeyCode::Enter));
        let commands = cmd::from_effects(&mut app, effects);
        cmd::run_cmds(&mut app, commands);
        assert_eq!(app.current_route.path, "data-grid");
        assert!(app.side_nav.search_term().is_empty());

        draw(&mut view, &mut app);
        assert!(!app.data_grid.cell_areas.is_empty());
    }
}
