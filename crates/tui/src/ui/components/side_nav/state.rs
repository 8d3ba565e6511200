use std::sync::Arc;
use std::time::Instant;

use guidekit_types::{Effect, NavigationSection, Route};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{debug, info};

use super::filter::{FilteredItem, FilteredSection, FilteredSubItem, filter_navigation};
use crate::ui::components::common::TextInputState;
use crate::ui::scheduling::{DeferredScroll, ScrollPoll};

/// A visible row of the navigation list, indexing into the filtered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavRow {
    Section { section: usize },
    Item { section: usize, item: usize },
    SubItem { section: usize, item: usize, sub: usize },
}

/// State for the guide's side navigation.
///
/// Owns the search input, the filtered tree derived from it, the flattened
/// rows currently shown and the deferred scroll that brings the selected
/// section into view after a route change.
#[derive(Debug)]
pub struct SideNavState {
    navigation: Arc<[NavigationSection]>,
    search: TextInputState,
    current_path: String,
    filtered: Vec<FilteredSection>,
    rows: Vec<NavRow>,
    cursor: usize,
    scroll_offset: usize,
    viewport_rows: usize,
    is_mounted: bool,
    pending_scroll: Option<DeferredScroll<String>>,

    container_focus: FocusFlag,
    pub f_search: FocusFlag,
    pub f_list: FocusFlag,
    /// Last rendered area; used for mouse hit testing.
    pub last_area: Rect,
    /// Last rendered list area (inside the border).
    pub list_area: Rect,
    /// Last rendered search input area.
    pub search_area: Rect,
}

impl SideNavState {
    pub fn new(navigation: Arc<[NavigationSection]>, current_path: impl Into<String>) -> Self {
        let mut state = Self {
            navigation,
            search: TextInputState::new(),
            current_path: current_path.into(),
            filtered: Vec::new(),
            rows: Vec::new(),
            cursor: 0,
            scroll_offset: 0,
            viewport_rows: 0,
            is_mounted: true,
            pending_scroll: None,
            container_focus: FocusFlag::named("side_nav"),
            f_search: FocusFlag::named("side_nav.search"),
            f_list: FocusFlag::named("side_nav.list"),
            last_area: Rect::default(),
            list_area: Rect::default(),
            search_area: Rect::default(),
        };
        state.refilter();
        state.cursor_to_selected();
        state
    }

    pub fn search(&self) -> &TextInputState {
        &self.search
    }

    pub fn search_term(&self) -> &str {
        self.search.input()
    }

    pub fn rows(&self) -> &[NavRow] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    #[cfg(test)]
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// True while the search field or the tree holds focus.
    pub fn is_focused(&self) -> bool {
        self.container_focus.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.is_mounted
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.pending_scroll.is_some()
    }

    // ========================
    // Search
    // ========================
    pub fn insert_search_char(&mut self, c: char) {
        self.search.insert_char(c);
        self.refilter();
    }

    pub fn remove_search_char(&mut self) {
        if self.search.backspace() {
            self.refilter();
        }
    }

    pub fn delete_search_char(&mut self) {
        if self.search.delete() {
            self.refilter();
        }
    }

    pub fn move_search_cursor_left(&mut self) {
        self.search.move_left();
    }

    pub fn move_search_cursor_right(&mut self) {
        self.search.move_right();
    }

    pub fn move_search_cursor_home(&mut self) {
        self.search.move_home();
    }

    pub fn move_search_cursor_end(&mut self) {
        self.search.move_end();
    }

    pub fn clear_search(&mut self) {
        if !self.search.is_empty() {
            self.search.clear();
            self.refilter();
        }
    }

    /// Re-runs the filter and rebuilds the visible rows, keeping the cursor
    /// in range.
    fn refilter(&mut self) {
        self.filtered = filter_navigation(&self.navigation, self.search.input(), &self.current_path);
        self.rows = build_rows(&self.filtered);
        debug!(term = self.search.input(), rows = self.rows.len(), "side nav refiltered");
        if self.rows.is_empty() {
            self.cursor = 0;
            self.scroll_offset = 0;
        } else {
            self.cursor = self.cursor.min(self.rows.len() - 1);
            self.clamp_scroll();
        }
    }

    // ========================
    // Rows
    // ========================
    pub fn section_at(&self, row: &NavRow) -> Option<&FilteredSection> {
        let (NavRow::Section { section } | NavRow::Item { section, .. } | NavRow::SubItem { section, .. }) = *row;
        self.filtered.get(section)
    }

    pub fn item_at(&self, row: &NavRow) -> Option<&FilteredItem> {
        match *row {
            NavRow::Item { section, item } | NavRow::SubItem { section, item, .. } => self.filtered.get(section)?.items.get(item),
            NavRow::Section { .. } => None,
        }
    }

    pub fn sub_item_at(&self, row: &NavRow) -> Option<&FilteredSubItem> {
        match *row {
            NavRow::SubItem { section, item, sub } => self.filtered.get(section)?.items.get(item)?.sub_items.get(sub),
            _ => None,
        }
    }

    /// Route a row links to; section headings are not links.
    pub fn route_at(&self, index: usize) -> Option<Route> {
        let row = self.rows.get(index)?;
        match row {
            NavRow::Section { .. } => None,
            NavRow::Item { .. } => self.item_at(row).map(|item| Route::new(&item.path)),
            NavRow::SubItem { .. } => {
                let item = self.item_at(row)?;
                let sub = self.sub_item_at(row)?;
                Some(Route::with_anchor(&item.path, &sub.anchor))
            }
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.viewport_rows > 0 && self.cursor >= self.scroll_offset + self.viewport_rows {
            self.scroll_offset = self.cursor + 1 - self.viewport_rows;
        }
    }

    pub fn set_cursor(&mut self, index: usize) {
        if index < self.rows.len() {
            self.cursor = index;
        }
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.max_scroll() as isize;
        self.scroll_offset = (self.scroll_offset as isize + delta).clamp(0, max) as usize;
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows;
        self.clamp_scroll();
    }

    fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(self.viewport_rows.max(1))
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    fn cursor_to_selected(&mut self) {
        if let Some(index) = self
            .rows
            .iter()
            .position(|row| matches!(row, NavRow::Item { .. }) && self.item_at(row).is_some_and(|item| item.is_selected))
        {
            self.cursor = index;
        }
    }

    fn selected_section_id(&self) -> Option<String> {
        self.filtered
            .iter()
            .find(|section| section.items.iter().any(|item| item.is_selected))
            .map(|section| section.id.clone())
    }

    // ========================
    // Routing
    // ========================

    /// Follows a link in the navigation.
    ///
    /// Clears the search, marks the route's page as current and schedules the
    /// selected section to scroll into view once the list has settled.
    /// Ignored while the navigation is unmounted.
    pub fn on_click_route(&mut self, route: Route, now: Instant) -> Vec<Effect> {
        if !self.is_mounted {
            debug!(%route, "side nav unmounted; ignoring route click");
            return Vec::new();
        }
        self.search.clear();
        self.current_path = route.path.clone();
        self.refilter();
        self.cursor_to_selected();
        if let Some(section_id) = self.selected_section_id() {
            self.pending_scroll = Some(DeferredScroll::after_settle(section_id, now));
        }
        info!(%route, "navigating");
        vec![Effect::SwitchTo(route)]
    }

    /// Activates the row under the cursor.
    pub fn activate(&mut self, now: Instant) -> Vec<Effect> {
        match self.route_at(self.cursor) {
            Some(route) => self.on_click_route(route, now),
            None => Vec::new(),
        }
    }

    /// Syncs the selection with a route change that originated elsewhere.
    pub fn set_current_path(&mut self, path: &str) {
        if self.current_path != path {
            self.current_path = path.to_string();
            self.refilter();
            self.cursor_to_selected();
        }
    }

    pub fn mount(&mut self) {
        self.is_mounted = true;
        self.refilter();
    }

    pub fn unmount(&mut self) {
        self.is_mounted = false;
    }

    /// Runs the pending scroll once it is due. Returns true when the view
    /// changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(task) = self.pending_scroll.as_mut() else {
            return false;
        };
        if !self.is_mounted {
            debug!(section = task.target().as_str(), "dropping scroll for unmounted side nav");
            self.pending_scroll = None;
            return false;
        }
        let rows = &self.rows;
        let filtered = &self.filtered;
        let outcome = task.poll(now, |section_id| {
            rows.iter().position(|row| match row {
                NavRow::Section { section } => filtered.get(*section).is_some_and(|s| &s.id == section_id),
                _ => false,
            })
        });
        if outcome.is_finished() {
            self.pending_scroll = None;
        }
        match outcome {
            ScrollPoll::Resolved(row) => {
                debug!(row, "side nav scrolled selected section into view");
                self.scroll_offset = row.min(self.max_scroll());
                true
            }
            _ => false,
        }
    }
}

/// Flattens the filtered tree; sub-items show only under a selected or
/// force-expanded item.
fn build_rows(filtered: &[FilteredSection]) -> Vec<NavRow> {
    let mut rows = Vec::new();
    for (section_index, section) in filtered.iter().enumerate() {
        rows.push(NavRow::Section { section: section_index });
        for (item_index, item) in section.items.iter().enumerate() {
            rows.push(NavRow::Item {
                section: section_index,
                item: item_index,
            });
            if item.is_selected || item.force_expand {
                rows.extend((0..item.sub_items.len()).map(|sub| NavRow::SubItem {
                    section: section_index,
                    item: item_index,
                    sub,
                }));
            }
        }
    }
    rows
}

impl HasFocus for SideNavState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_search);
        builder.leaf_widget(&self.f_list);
        builder.end(tag);
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
    use crate::ui::scheduling::SCROLL_SETTLE_DELAY;
    use guidekit_types::{NavigationItem, SubSection};

    fn navigation() -> Arc<[NavigationSection]> {
        Arc::from(vec![
            NavigationSection {
                kind: "components".into(),
                name: "Components".into(),
                items: vec![
                    NavigationItem::new("Button", "button"),
                    NavigationItem::new("Badge", "badge")
                        .with_sections(vec![SubSection::new("colors", "Colors"), SubSection::new("sizes", "Sizes")]),
                ],
            },
            NavigationSection {
                kind: "tabular".into(),
                name: "Tabular content".into(),
                items: vec![NavigationItem::new("Data grid", "data-grid")],
            },
        ])
    }

    #[test]
    fn sub_items_visible_only_when_selected_or_forced() {
        let mut state = SideNavState::new(navigation(), "button");
        assert!(!state.rows().iter().any(|row| matches!(row, NavRow::SubItem { .. })));

        state.set_current_path("badge");
        let subs = state.rows().iter().filter(|row| matches!(row, NavRow::SubItem { .. })).count();
        assert_eq!(subs, 2);

        state.set_current_path("button");
        for c in "sizes".chars() {
            state.insert_search_char(c);
        }
        assert_eq!(
            state.rows(),
            &[
                NavRow::Section { section: 0 },
                NavRow::Item { section: 0, item: 0 },
                NavRow::SubItem { section: 0, item: 0, sub: 0 },
            ]
        );
        assert_eq!(state.route_at(2), Some(Route::with_anchor("badge", "sizes")));
        assert_eq!(state.route_at(0), None);
    }

    #[test]
    fn clicking_a_route_clears_search_and_schedules_scroll() {
        let now = Instant::now();
        let mut state = SideNavState::new(navigation(), "button");
        state.insert_search_char('g');
        state.set_viewport_rows(2);

        let effects = state.on_click_route(Route::new("data-grid"), now);
        assert_eq!(effects, vec![Effect::SwitchTo(Route::new("data-grid"))]);
        assert_eq!(state.search_term(), "");
        assert!(state.has_pending_scroll());

        assert!(!state.tick(now));
        assert!(state.tick(now + SCROLL_SETTLE_DELAY));
        assert!(!state.has_pending_scroll());
        assert_eq!(state.scroll_offset(), 3);
    }

    #[test]
    fn unmounted_nav_suppresses_clicks_and_pending_scroll() {
        let now = Instant::now();
        let mut state = SideNavState::new(navigation(), "button");
        state.on_click_route(Route::new("badge"), now);
        state.unmount();

        assert!(!state.tick(now + SCROLL_SETTLE_DELAY));
        assert!(!state.has_pending_scroll());
        assert!(state.on_click_route(Route::new("button"), now).is_empty());
        assert_eq!(state.current_path(), "badge");
    }

    #[test]
    fn cursor_stays_in_range_when_results_shrink() {
        let mut state = SideNavState::new(navigation(), "button");
        state.move_cursor(10);
        assert_eq!(state.cursor(), state.rows().len() - 1);
        for c in "zzz".chars() {
            state.insert_search_char(c);
        }
        assert!(state.filtered.is_empty());
        assert_eq!(state.cursor(), 0);
        assert!(state.activate(Instant::now()).is_empty());
    }
}
