//! # guidekit TUI
//!
//! Terminal component guide: a searchable side navigation, guide pages with
//! anchored sub-sections, and two live demos (a data grid with cell popovers
//! and a date picker quick select).
//!
//! ## Architecture
//!
//! Every pane is a stateless `Component` that reads and mutates its state on
//! [`App`](app::App) and describes side effects as `Effect`s. The runtime
//! owns the terminal, routes input, applies effects through `cmd` and renders
//! after each visible change.

mod app;
mod cmd;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use guidekit_types::{NavigationSection, Route};
use guidekit_util::UserPreferences;

pub use ui::components::side_nav::{FilteredItem, FilteredSection, FilteredSubItem, HighlightedText, filter_navigation};
pub use ui::theme::THEME_IDS;

/// Everything the TUI needs to start.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The navigation manifest to browse.
    pub navigation: Vec<NavigationSection>,
    /// Page to open first; defaults to the first visible page.
    pub initial_route: Option<Route>,
    /// Theme requested on the command line.
    pub theme: Option<String>,
    /// Format used when labelling absolute dates.
    pub date_format: String,
    pub preferences: Arc<UserPreferences>,
}

/// Runs the TUI until the user quits with Ctrl+C.
///
/// # Errors
///
/// Returns an error when the terminal cannot be put into (or restored from)
/// raw mode, or when drawing fails.
pub async fn run(config: RunConfig) -> Result<()> {
    ui::runtime::run_app(config).await
}
