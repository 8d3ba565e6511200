//! Application state for the guide.
//!
//! `App` owns the state of every pane and overlay. Components are stateless
//! and read or mutate this state while handling events; side effects they
//! request come back to the runtime as `Effect`s.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use guidekit_types::{Effect, Msg, NavigationSection, Route, Severity};
use guidekit_util::UserPreferences;
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::debug;

use crate::RunConfig;
use crate::ui::components::cell_popover::CellPopoverState;
use crate::ui::components::data_grid::{DataGridState, demo::demo_grid};
use crate::ui::components::guide_page::{GuidePageState, PageDemo};
use crate::ui::components::quick_select::{QuickSelectProps, QuickSelectState, panels::demo_panels};
use crate::ui::components::side_nav::SideNavState;
use crate::ui::theme::{self, Theme};

/// Cross-cutting shared context owned by the App.
///
/// Holds runtime-wide objects like the active theme, the navigation manifest
/// and the preferences store.
pub struct SharedCtx {
    /// Active UI theme
    pub theme: Box<dyn Theme>,
    /// Identifier of the active theme
    pub theme_id: &'static str,
    /// Persisted user preferences
    pub preferences: Arc<UserPreferences>,
    /// Format used when labelling absolute dates
    pub date_format: String,
    /// The navigation manifest shared by the side nav and the guide page
    pub navigation: Arc<[NavigationSection]>,
}

impl SharedCtx {
    pub fn new(config: &RunConfig) -> Self {
        let preferred = config.preferences.preferred_theme();
        let loaded = theme::load(config.theme.as_deref(), preferred.as_deref());
        Self {
            theme: loaded.theme,
            theme_id: loaded.id,
            preferences: Arc::clone(&config.preferences),
            date_format: config.date_format.clone(),
            navigation: Arc::from(config.navigation.clone()),
        }
    }
}

impl std::fmt::Debug for SharedCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCtx")
            .field("theme_id", &self.theme_id)
            .field("date_format", &self.date_format)
            .field("sections", &self.navigation.len())
            .finish()
    }
}

/// One-line message shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub severity: Severity,
    pub message: String,
}

/// The main application state.
#[derive(Debug)]
pub struct App {
    /// Shared, cross-cutting context (theme, manifest, preferences)
    pub ctx: SharedCtx,
    /// Focus tree, rebuilt before each render
    pub focus: Rc<Focus>,
    /// The route currently shown by the guide page
    pub current_route: Route,
    /// Searchable navigation pane
    pub side_nav: SideNavState,
    /// The page for the current route
    pub guide_page: GuidePageState,
    /// Grid shown on the data grid page
    pub data_grid: DataGridState,
    /// Detail popover opened from a grid cell
    pub cell_popover: CellPopoverState,
    /// Quick select shown on the date picker page
    pub quick_select: QuickSelectState,
    /// Footer status message
    pub status: Option<StatusLine>,
    container_focus: FocusFlag,
}

impl App {
    pub fn new(config: &RunConfig) -> Self {
        let ctx = SharedCtx::new(config);
        let now = Instant::now();
        let route = config.initial_route.clone().unwrap_or_else(|| default_route(&ctx.navigation));
        debug!(route = %route, theme = ctx.theme_id, "starting guide");

        let quick_select = QuickSelectState::new(QuickSelectProps {
            recently_used_ranges: ctx.preferences.recently_used_ranges(),
            custom_panels: demo_panels(),
            date_format: ctx.date_format.clone(),
            ..QuickSelectProps::default()
        });

        let mut app = Self {
            side_nav: SideNavState::new(Arc::clone(&ctx.navigation), route.path.clone()),
            guide_page: GuidePageState::new(Arc::clone(&ctx.navigation), route.clone(), now),
            data_grid: demo_grid(),
            cell_popover: CellPopoverState::default(),
            quick_select,
            current_route: route,
            status: None,
            focus: Rc::new(Focus::default()),
            container_focus: FocusFlag::named("app"),
            ctx,
        };
        app.focus = Rc::new(FocusBuilder::build_for(&app));
        app.focus.first();
        app
    }

    /// Rebuilds the focus tree after a structural change such as an overlay
    /// opening, keeping the current focus when it still exists.
    pub fn rebuild_focus(&mut self) {
        let old_focus = std::mem::take(&mut self.focus);
        self.focus = Rc::new(FocusBuilder::rebuild_for(self, Some(Rc::unwrap_or_clone(old_focus))));
    }

    /// True while a deferred scroll is waiting to run; the runtime ticks
    /// faster while this holds.
    pub fn has_deferred_work(&self) -> bool {
        self.side_nav.has_pending_scroll() || self.guide_page.has_pending_scroll()
    }

    pub fn set_status(&mut self, severity: Severity, message: impl Into<String>) {
        self.status = Some(StatusLine {
            severity,
            message: message.into(),
        });
    }

    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                let now = Instant::now();
                let nav_scrolled = self.side_nav.tick(now);
                let page_scrolled = self.guide_page.tick(now);
                if nav_scrolled || page_scrolled {
                    debug!(nav_scrolled, page_scrolled, "deferred scroll applied");
                }
            }
            Msg::Resize(width, height) => {
                debug!(width, height, "terminal resized");
            }
        }
        Vec::new()
    }
}

/// First visible page in the manifest, or the root route.
fn default_route(navigation: &[NavigationSection]) -> Route {
    navigation
        .iter()
        .flat_map(|section| section.items.iter())
        .find(|item| !item.hidden)
        .map(|item| Route::new(item.path.clone()))
        .unwrap_or_default()
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        if self.side_nav.is_mounted() {
            builder.widget(&self.side_nav);
        }
        builder.widget(&self.guide_page);
        match self.guide_page.demo() {
            PageDemo::DatePicker => {
                builder.widget(&self.quick_select);
            }
            PageDemo::DataGrid => {
                builder.widget(&self.data_grid);
            }
            PageDemo::None => {}
        }
        if self.cell_popover.is_open() {
            builder.widget(&self.cell_popover);
        }
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use guidekit_types::NavigationItem;

    pub(crate) fn test_config() -> RunConfig {
        let mut hidden = NavigationItem::new("Changelog", "changelog");
        hidden.hidden = true;
        RunConfig {
            navigation: vec![NavigationSection {
                kind: "display".into(),
                name: "Display".into(),
                items: vec![
                    hidden,
                    NavigationItem::new("Date picker", "date-picker"),
                    NavigationItem::new("Data grid", "data-grid"),
                ],
            }],
            initial_route: None,
            theme: Some("nord".into()),
            date_format: guidekit_util::DEFAULT_DATE_FORMAT.into(),
            preferences: Arc::new(UserPreferences::ephemeral()),
        }
    }

    #[test]
    fn starts_on_first_visible_page() {
        let app = App::new(&test_config());
        assert_eq!(app.current_route, Route::new("date-picker"));
        assert_eq!(app.guide_page.demo(), PageDemo::DatePicker);
        assert!(!app.has_deferred_work());
    }

    #[test]
    fn anchored_start_route_leaves_deferred_work() {
        let mut config = test_config();
        config.initial_route = Some(Route::with_anchor("data-grid", "popovers"));
        let app = App::new(&config);
        assert_eq!(app.guide_page.demo(), PageDemo::DataGrid);
        assert!(app.has_deferred_work());
    }

    #[test]
    fn status_replaces_previous_message() {
        let mut app = App::new(&test_config());
        app.set_status(Severity::Info, "first");
        app.set_status(Severity::Error, "second");
        assert_eq!(
            app.status,
            Some(StatusLine {
                severity: Severity::Error,
                message: "second".into()
            })
        );
    }
}
