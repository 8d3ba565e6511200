use std::sync::Arc;
use std::time::Instant;

use guidekit_types::{NavigationItem, NavigationSection, Route};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::debug;

use crate::ui::scheduling::{DeferredScroll, ScrollPoll};

/// Live demo embedded in a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDemo {
    None,
    DatePicker,
    DataGrid,
}

impl PageDemo {
    pub fn for_path(path: &str) -> Self {
        match path {
            "date-picker" => Self::DatePicker,
            "data-grid" => Self::DataGrid,
            _ => Self::None,
        }
    }
}

/// A page resolved from the manifest, hidden pages included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
    pub section_name: String,
    pub item: NavigationItem,
}

/// State for the guide page pane: the current route, its resolved page, the
/// scroll position and the pending anchor scroll.
#[derive(Debug)]
pub struct GuidePageState {
    navigation: Arc<[NavigationSection]>,
    route: Route,
    page: Option<ResolvedPage>,
    scroll_offset: usize,
    viewport_rows: usize,
    content_rows: usize,
    /// Anchor id and content row of every heading laid out on the last frame.
    heading_rows: Vec<(String, usize)>,
    pending_anchor: Option<DeferredScroll<String>>,

    pub focus: FocusFlag,
    pub last_area: Rect,
}

impl GuidePageState {
    pub fn new(navigation: Arc<[NavigationSection]>, route: Route, now: Instant) -> Self {
        let mut state = Self {
            navigation,
            route: Route::default(),
            page: None,
            scroll_offset: 0,
            viewport_rows: 0,
            content_rows: 0,
            heading_rows: Vec::new(),
            pending_anchor: None,
            focus: FocusFlag::named("guide_page"),
            last_area: Rect::default(),
        };
        state.set_route(route, now);
        state
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn page(&self) -> Option<&ResolvedPage> {
        self.page.as_ref()
    }

    pub fn demo(&self) -> PageDemo {
        PageDemo::for_path(&self.route.path)
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.pending_anchor.is_some()
    }

    /// Shows the page for `route`. An anchor schedules a scroll to its
    /// heading, retried until the heading has been laid out.
    pub fn set_route(&mut self, route: Route, now: Instant) {
        if route.path != self.route.path {
            self.page = resolve_page(&self.navigation, &route.path);
            self.scroll_offset = 0;
            self.heading_rows.clear();
            self.content_rows = 0;
        }
        self.pending_anchor = route.anchor.clone().map(|anchor| DeferredScroll::with_retries(anchor, now));
        self.route = route;
    }

    /// Records the layout produced by the last render.
    pub fn record_layout(&mut self, heading_rows: Vec<(String, usize)>, content_rows: usize, viewport_rows: usize) {
        self.heading_rows = heading_rows;
        self.content_rows = content_rows;
        self.viewport_rows = viewport_rows;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    fn max_scroll(&self) -> usize {
        self.content_rows.saturating_sub(self.viewport_rows.max(1))
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.max_scroll() as isize;
        self.scroll_offset = (self.scroll_offset as isize + delta).clamp(0, max) as usize;
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    pub fn page_rows(&self) -> isize {
        self.viewport_rows.max(1) as isize
    }

    /// Polls the pending anchor scroll. Returns true when the view changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(task) = self.pending_anchor.as_mut() else {
            return false;
        };
        let heading_rows = &self.heading_rows;
        let outcome = task.poll(now, |anchor| heading_rows.iter().find(|(id, _)| id == anchor).map(|(_, row)| *row));
        match outcome {
            ScrollPoll::Resolved(row) => {
                debug!(row, "scrolled guide page to anchor");
                self.pending_anchor = None;
                self.scroll_offset = row.min(self.max_scroll());
                true
            }
            ScrollPoll::Abandoned => {
                debug!(route = %self.route, "anchor never appeared; giving up");
                self.pending_anchor = None;
                false
            }
            ScrollPoll::Pending | ScrollPoll::Rescheduled => false,
        }
    }
}

fn resolve_page(navigation: &[NavigationSection], path: &str) -> Option<ResolvedPage> {
    navigation.iter().find_map(|section| {
        section.items.iter().find(|item| item.path == path).map(|item| ResolvedPage {
            section_name: section.name.clone(),
            item: item.clone(),
        })
    })
}

impl HasFocus for GuidePageState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::scheduling::{SCROLL_RETRY_ATTEMPTS, SCROLL_RETRY_DELAY};
    use guidekit_types::SubSection;

    fn navigation() -> Arc<[NavigationSection]> {
        let mut changelog = NavigationItem::new("Changelog", "changelog");
        changelog.hidden = true;
        Arc::from(vec![NavigationSection {
            kind: "display".into(),
            name: "Display".into(),
            items: vec![
                NavigationItem::new("Badge", "badge")
                    .with_sections(vec![SubSection::new("colors", "Colors"), SubSection::new("sizes", "Sizes")]),
                changelog,
            ],
        }])
    }

    #[test]
    fn resolves_hidden_pages_and_demos() {
        let now = Instant::now();
        let mut page = GuidePageState::new(navigation(), Route::new("changelog"), now);
        assert_eq!(page.page().map(|p| p.item.name.as_str()), Some("Changelog"));
        assert_eq!(page.demo(), PageDemo::None);

        page.set_route(Route::new("missing"), now);
        assert!(page.page().is_none());
        assert_eq!(PageDemo::for_path("data-grid"), PageDemo::DataGrid);
    }

    #[test]
    fn anchor_scroll_waits_for_layout() {
        let now = Instant::now();
        let mut page = GuidePageState::new(navigation(), Route::with_anchor("badge", "sizes"), now);
        assert!(!page.tick(now));
        assert!(page.has_pending_scroll());

        page.record_layout(vec![("colors".into(), 2), ("sizes".into(), 9)], 30, 10);
        assert!(page.tick(now + SCROLL_RETRY_DELAY));
        assert_eq!(page.scroll_offset(), 9);
        assert!(!page.has_pending_scroll());
    }

    #[test]
    fn missing_anchor_is_dropped_after_bounded_retries() {
        let mut now = Instant::now();
        let mut page = GuidePageState::new(navigation(), Route::with_anchor("badge", "nope"), now);
        page.record_layout(vec![("colors".into(), 2)], 30, 10);
        for _ in 0..=SCROLL_RETRY_ATTEMPTS {
            assert!(page.has_pending_scroll());
            assert!(!page.tick(now));
            now += SCROLL_RETRY_DELAY;
        }
        assert!(!page.has_pending_scroll());
        assert_eq!(page.scroll_offset(), 0);
    }
}
