//! Caller-supplied panels for the quick select popover.
//!
//! A panel is a title plus a function producing its choices. Every choice
//! carries a complete `ApplyTime` request, so activating one goes through the
//! same `apply_time` path as the built-in panels.

use std::fmt;
use std::sync::Arc;

use guidekit_types::{ApplyTime, QuickSelect, Tense, TimeUnit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelChoice {
    pub label: String,
    pub request: ApplyTime,
}

impl PanelChoice {
    pub fn new(label: impl Into<String>, request: ApplyTime) -> Self {
        Self {
            label: label.into(),
            request,
        }
    }
}

pub type PanelContentFn = Arc<dyn Fn() -> Vec<PanelChoice> + Send + Sync>;

#[derive(Clone)]
pub struct QuickSelectPanel {
    pub title: String,
    content: PanelContentFn,
}

impl QuickSelectPanel {
    pub fn new(title: impl Into<String>, content: impl Fn() -> Vec<PanelChoice> + Send + Sync + 'static) -> Self {
        Self {
            title: title.into(),
            content: Arc::new(content),
        }
    }

    pub fn choices(&self) -> Vec<PanelChoice> {
        (self.content)()
    }
}

impl fmt::Debug for QuickSelectPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuickSelectPanel").field("title", &self.title).finish_non_exhaustive()
    }
}

/// Panel shown by the date-picker page to demonstrate custom content.
pub fn demo_panels() -> Vec<QuickSelectPanel> {
    vec![QuickSelectPanel::new("Shift windows", || {
        vec![
            PanelChoice::new("Current shift (8 hours)", QuickSelect::new(Tense::Last, 8, TimeUnit::Hours).to_apply_time()),
            PanelChoice::new("Since midnight", ApplyTime::range("now/d", "now")),
            PanelChoice::new("Preview next hour (stay open)", ApplyTime::range("now", "now+1h").keep_open(true)),
        ]
    })]
}
