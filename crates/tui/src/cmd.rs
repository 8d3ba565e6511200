//! # Command Execution Layer
//!
//! This module translates high-level application effects (`Effect`) into
//! imperative commands (`Cmd`) and executes them. It is the boundary where
//! the pure state management of the app meets side effects such as writing
//! to the system clipboard or persisting preferences.
//!
//! ## Design
//! - [`Cmd`] is the effectful command type.
//! - [`from_effects`] applies the state half of each [`Effect`] and returns
//!   the [`Cmd`]s that still need to touch the outside world.
//! - [`run_cmds`] executes those commands and reports failures in the footer.

use std::time::Instant;

use guidekit_types::{DurationRange, Effect, Route, Severity};
use guidekit_util::pretty_duration;
use tracing::{debug, info, warn};

use crate::app::App;
use crate::ui::components::cell_popover::CellPopoverState;
use crate::ui::components::guide_page::PageDemo;

/// Side-effectful commands executed outside of pure state updates.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Write text into the system clipboard.
    ClipboardSet(String),
    /// Move a range to the front of the persisted recently used list.
    RememberRange(DurationRange),
    /// Persist the preferred theme identifier.
    SaveTheme(String),
}

/// Applies `effects` to the app state and collects the commands they imply.
pub fn from_effects(app: &mut App, effects: Vec<Effect>) -> Vec<Cmd> {
    let mut commands = Vec::new();
    for effect in effects {
        match effect {
            Effect::SwitchTo(route) => switch_to(app, route),
            Effect::ApplyTime { start, end } => {
                let props = &mut app.quick_select.props;
                let label = pretty_duration(&start, &end, &props.commonly_used_ranges, &props.date_format);
                props.start = start.clone();
                props.end = end.clone();
                app.set_status(Severity::Info, format!("Showing {label}"));
                commands.push(Cmd::RememberRange(DurationRange::new(start, end)));
            }
            Effect::ApplyRefreshInterval(refresh) => {
                app.quick_select.props.refresh = refresh;
                let message = if refresh.is_paused {
                    "Auto-refresh paused".to_string()
                } else {
                    format!("Auto-refresh every {} ms", refresh.interval_ms)
                };
                app.set_status(Severity::Info, message);
            }
            Effect::CopyToClipboardRequested(text) => commands.push(Cmd::ClipboardSet(text)),
            Effect::Status(severity, message) => app.set_status(severity, message),
            Effect::ThemeChanged(theme_id) => commands.push(Cmd::SaveTheme(theme_id)),
        }
    }
    commands
}

/// Shows `route` in the guide page and keeps the side nav selection in sync.
fn switch_to(app: &mut App, route: Route) {
    info!(route = %route, "navigating");
    let demo = PageDemo::for_path(&route.path);
    if demo != PageDemo::DataGrid && app.cell_popover.is_open() {
        app.cell_popover = CellPopoverState::default();
    }
    if demo != PageDemo::DatePicker && app.quick_select.is_open() {
        app.quick_select.close();
    }
    app.side_nav.set_current_path(&route.path);
    app.guide_page.set_route(route.clone(), Instant::now());
    app.current_route = route;
    app.rebuild_focus();
}

/// Executes commands, reporting failures in the footer.
pub fn run_cmds(app: &mut App, commands: Vec<Cmd>) {
    for command in commands {
        match command {
            Cmd::ClipboardSet(text) => execute_clipboard_set(app, text),
            Cmd::RememberRange(range) => execute_remember_range(app, range),
            Cmd::SaveTheme(theme_id) => execute_save_theme(app, theme_id),
        }
    }
}

fn execute_clipboard_set(app: &mut App, text: String) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.clone())) {
        Ok(()) => {
            debug!(bytes = text.len(), "copied to clipboard");
            app.set_status(Severity::Info, format!("Copied: {text}"));
        }
        Err(error) => {
            warn!(%error, "clipboard write failed");
            app.set_status(Severity::Error, format!("Clipboard error: {error}"));
        }
    }
}

fn execute_remember_range(app: &mut App, range: DurationRange) {
    match app.ctx.preferences.remember_range(range) {
        Ok(recent) => app.quick_select.props.recently_used_ranges = recent,
        Err(error) => {
            warn!(%error, "could not persist recently used range");
            app.set_status(Severity::Warning, format!("Could not save recent range: {error}"));
        }
    }
}

fn execute_save_theme(app: &mut App, theme_id: String) {
    if let Err(error) = app.ctx.preferences.set_preferred_theme(Some(theme_id)) {
        warn!(%error, "could not persist theme preference");
        app.set_status(Severity::Warning, format!("Could not save theme: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_config;
    use crate::ui::components::data_grid::CellPosition;
    use guidekit_types::RefreshInterval;

    #[test]
    fn switch_to_syncs_nav_and_page() {
        let mut app = App::new(&test_config());
        let commands = from_effects(&mut app, vec![Effect::SwitchTo(Route::new("data-grid"))]);
        assert!(commands.is_empty());
        assert_eq!(app.current_route, Route::new("data-grid"));
        assert_eq!(app.side_nav.current_path(), "data-grid");
        assert_eq!(app.guide_page.demo(), PageDemo::DataGrid);
    }

    #[test]
    fn leaving_the_grid_closes_its_popover() {
        let mut app = App::new(&test_config());
        from_effects(&mut app, vec![Effect::SwitchTo(Route::new("data-grid"))]);
        app.cell_popover.open(CellPosition::new(0, 0), 1);
        from_effects(&mut app, vec![Effect::SwitchTo(Route::new("date-picker"))]);
        assert!(!app.cell_popover.is_open());
    }

    #[test]
    fn apply_time_updates_props_and_remembers_the_range() {
        let mut app = App::new(&test_config());
        let effects = vec![Effect::ApplyTime {
            start: "now-1h".into(),
            end: "now".into(),
        }];
        let commands = from_effects(&mut app, effects);
        assert_eq!(app.quick_select.props.start, "now-1h");
        assert_eq!(commands, vec![Cmd::RememberRange(DurationRange::new("now-1h", "now"))]);

        run_cmds(&mut app, commands);
        let recent = &app.quick_select.props.recently_used_ranges;
        assert_eq!(recent.len(), 1);
        assert!(recent[0].same_span(&DurationRange::new("now-1h", "now")));
    }

    #[test]
    fn refresh_and_status_effects_update_state() {
        let mut app = App::new(&test_config());
        let refresh = RefreshInterval {
            interval_ms: 5_000,
            is_paused: false,
        };
        from_effects(&mut app, vec![Effect::ApplyRefreshInterval(refresh)]);
        assert_eq!(app.quick_select.props.refresh, refresh);

        from_effects(&mut app, vec![Effect::Status(Severity::Warning, "careful".into())]);
        let status = app.status.as_ref().map(|s| (s.severity, s.message.as_str()));
        assert_eq!(status, Some((Severity::Warning, "careful")));
    }

    #[test]
    fn theme_change_is_persisted() {
        let mut app = App::new(&test_config());
        let commands = from_effects(&mut app, vec![Effect::ThemeChanged("dracula".into())]);
        run_cmds(&mut app, commands);
        assert_eq!(app.ctx.preferences.preferred_theme().as_deref(), Some("dracula"));
    }
}
