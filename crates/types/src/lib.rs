//! Shared types for the guidekit crates.
//!
//! The navigation manifest model, the date-range model used by the quick
//! select popover, routes, and the `Msg`/`Effect` enums that connect
//! components to the runtime all live here so that the utility crate and the
//! TUI can agree on them without depending on each other.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod navigation;
pub mod time_range;

pub use navigation::{NavigationItem, NavigationSection, SubSection};
pub use time_range::{ApplyTime, DurationRange, QuickSelect, RefreshInterval, Tense, TimeUnit};

/// A location inside the guide, written as `#/path` or `#/path#anchor`.
///
/// The path identifies a navigation item and the optional anchor identifies
/// one of its sub-sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    pub anchor: Option<String>,
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            anchor: None,
        }
    }

    pub fn with_anchor(path: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            anchor: Some(anchor.into()),
        }
    }

    /// Parses an href such as `#/button#colors`, `/button` or `button`.
    ///
    /// Parsing is total: an empty href yields the root route.
    pub fn parse(href: &str) -> Self {
        let trimmed = href.trim();
        let without_hash = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let without_slash = without_hash.strip_prefix('/').unwrap_or(without_hash);
        match without_slash.split_once('#') {
            Some((path, anchor)) if !anchor.is_empty() => Self::with_anchor(path, anchor),
            Some((path, _)) => Self::new(path),
            None => Self::new(without_slash),
        }
    }

    /// The href of the page itself, without the anchor.
    pub fn page_href(&self) -> String {
        format!("#/{}", self.path)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.anchor {
            Some(anchor) => write!(f, "#/{}#{}", self.path, anchor),
            None => write!(f, "#/{}", self.path),
        }
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Severity attached to status messages shown in the footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

/// Messages that the runtime delivers to components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Periodic tick; drives deferred scrolling.
    Tick,
    /// Terminal resized
    Resize(u16, u16),
}

/// Side effects that components request from the runtime.
///
/// Components never act on the outside world directly. They describe what
/// should happen and the runtime carries it out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Navigate to a guide page (and optionally a sub-section on it).
    SwitchTo(Route),
    /// Forward a selected date range to the date picker host.
    ApplyTime { start: String, end: String },
    /// Forward a new refresh interval to the date picker host.
    ApplyRefreshInterval(RefreshInterval),
    /// Copy text to the system clipboard
    CopyToClipboardRequested(String),
    /// Show a one-line status message in the footer.
    Status(Severity, String),
    /// Persist the active theme as the user's preferred one.
    ThemeChanged(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_parses_hash_hrefs() {
        assert_eq!(Route::parse("#/button"), Route::new("button"));
        assert_eq!(Route::parse("#/badge#colors"), Route::with_anchor("badge", "colors"));
        assert_eq!(Route::parse("badge"), Route::new("badge"));
        assert_eq!(Route::parse("/badge#"), Route::new("badge"));
        assert_eq!(Route::parse(""), Route::new(""));
    }

    #[test]
    fn route_display_matches_guide_hrefs() {
        assert_eq!(Route::with_anchor("badge", "sizes").to_string(), "#/badge#sizes");
        assert_eq!(Route::new("badge").to_string(), "#/badge");
        assert_eq!(Route::with_anchor("badge", "sizes").page_href(), "#/badge");
        let parsed: Route = "#/data-grid#popovers".parse().unwrap();
        assert_eq!(parsed.anchor.as_deref(), Some("popovers"));
    }
}
