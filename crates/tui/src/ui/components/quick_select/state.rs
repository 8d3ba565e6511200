use guidekit_types::{ApplyTime, DurationRange, Effect, QuickSelect, RefreshInterval};
use guidekit_util::DEFAULT_DATE_FORMAT;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{debug, info};

use super::panels::QuickSelectPanel;

/// Glyph for the toggle button while paused (and not auto-refresh-only).
pub const CALENDAR_ICON: &str = "▦";
/// Glyph for the toggle button otherwise.
pub const CLOCK_ICON: &str = "◷";

const MAX_AMOUNT: u32 = 9_999;

/// Inputs owned by the date picker host.
#[derive(Debug, Clone)]
pub struct QuickSelectProps {
    pub start: String,
    pub end: String,
    pub commonly_used_ranges: Vec<DurationRange>,
    pub recently_used_ranges: Vec<DurationRange>,
    pub custom_panels: Vec<QuickSelectPanel>,
    pub date_format: String,
    pub is_auto_refresh_only: bool,
    pub is_disabled: bool,
    pub refresh: RefreshInterval,
}

impl Default for QuickSelectProps {
    fn default() -> Self {
        Self {
            start: "now-15m".into(),
            end: "now".into(),
            commonly_used_ranges: default_commonly_used_ranges(),
            recently_used_ranges: Vec::new(),
            custom_panels: Vec::new(),
            date_format: DEFAULT_DATE_FORMAT.into(),
            is_auto_refresh_only: false,
            is_disabled: false,
            refresh: RefreshInterval::default(),
        }
    }
}

pub fn default_commonly_used_ranges() -> Vec<DurationRange> {
    vec![
        DurationRange::labeled("now/d", "now/d", "Today"),
        DurationRange::labeled("now/w", "now/w", "This week"),
        DurationRange::labeled("now-15m", "now", "Last 15 minutes"),
        DurationRange::labeled("now-30m", "now", "Last 30 minutes"),
        DurationRange::labeled("now-1h", "now", "Last 1 hour"),
        DurationRange::labeled("now-24h", "now", "Last 24 hours"),
        DurationRange::labeled("now-7d", "now", "Last 7 days"),
        DurationRange::labeled("now-30d", "now", "Last 30 days"),
        DurationRange::labeled("now-90d", "now", "Last 90 days"),
        DurationRange::labeled("now-1y", "now", "Last 1 year"),
    ]
}

/// Units offered by the refresh-interval control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
}

impl RefreshUnit {
    pub fn millis(self) -> u64 {
        match self {
            Self::Seconds => 1_000,
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Minutes => "m",
            Self::Hours => "h",
        }
    }

    pub fn cycle(self, forward: bool) -> Self {
        match (self, forward) {
            (Self::Seconds, true) | (Self::Hours, false) => Self::Minutes,
            (Self::Minutes, true) | (Self::Seconds, false) => Self::Hours,
            (Self::Hours, true) | (Self::Minutes, false) => Self::Seconds,
        }
    }

    /// Largest unit that divides `interval_ms` exactly.
    fn split(interval_ms: u64) -> (u64, Self) {
        [Self::Hours, Self::Minutes, Self::Seconds]
            .into_iter()
            .find(|unit| interval_ms > 0 && interval_ms % unit.millis() == 0)
            .map(|unit| (interval_ms / unit.millis(), unit))
            .unwrap_or((interval_ms / 1_000, Self::Seconds))
    }
}

/// A focusable row in the popover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickSelectEntry {
    Tense,
    Amount,
    Unit,
    Apply,
    Common(usize),
    Recent(usize),
    Custom { panel: usize, choice: usize },
    RefreshPause,
    RefreshValue,
    RefreshUnit,
}

/// State of the date picker's quick select popover.
#[derive(Debug)]
pub struct QuickSelectState {
    pub props: QuickSelectProps,
    is_open: bool,
    last_applied: Option<QuickSelect>,
    editor: QuickSelect,
    refresh_value: u64,
    refresh_unit: RefreshUnit,
    refresh_paused: bool,
    cursor: usize,

    pub focus: FocusFlag,
    pub button_area: Rect,
    pub last_area: Rect,
    /// Entries rendered on the last frame and where.
    pub entry_areas: Vec<(QuickSelectEntry, Rect)>,
}

impl QuickSelectState {
    pub fn new(props: QuickSelectProps) -> Self {
        let (refresh_value, refresh_unit) = RefreshUnit::split(props.refresh.interval_ms);
        let refresh_paused = props.refresh.is_paused;
        Self {
            props,
            is_open: false,
            last_applied: None,
            editor: QuickSelect::default(),
            refresh_value,
            refresh_unit,
            refresh_paused,
            cursor: 0,
            focus: FocusFlag::named("quick_select"),
            button_area: Rect::default(),
            last_area: Rect::default(),
            entry_areas: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn last_applied(&self) -> Option<QuickSelect> {
        self.last_applied
    }

    pub fn editor(&self) -> QuickSelect {
        self.editor
    }

    pub fn refresh_editor(&self) -> (u64, RefreshUnit, bool) {
        (self.refresh_value, self.refresh_unit, self.refresh_paused)
    }

    pub fn cursor_entry(&self) -> Option<QuickSelectEntry> {
        self.entries().get(self.cursor).copied()
    }

    pub fn button_icon(&self) -> &'static str {
        if self.props.refresh.is_paused && !self.props.is_auto_refresh_only {
            CALENDAR_ICON
        } else {
            CLOCK_ICON
        }
    }

    /// Opens or closes the popover; a disabled picker stays closed.
    pub fn toggle(&mut self) {
        if self.props.is_disabled {
            debug!("quick select is disabled; ignoring toggle");
            return;
        }
        if self.is_open {
            self.close();
            return;
        }
        self.is_open = true;
        self.cursor = 0;
        self.editor = self.last_applied.unwrap_or_default();
        let (value, unit) = RefreshUnit::split(self.props.refresh.interval_ms);
        self.refresh_value = value;
        self.refresh_unit = unit;
        self.refresh_paused = self.props.refresh.is_paused;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.last_area = Rect::default();
        self.entry_areas.clear();
    }

    /// The single path every panel applies a range through.
    ///
    /// Forwards the range to the host, remembers the preset that produced it
    /// and closes the popover unless asked to stay open.
    pub fn apply_time(&mut self, request: ApplyTime) -> Vec<Effect> {
        info!(start = request.start.as_str(), end = request.end.as_str(), "applying time range");
        if let Some(quick_select) = request.quick_select {
            self.last_applied = Some(quick_select);
        }
        if !request.keep_popover_open {
            self.close();
        }
        vec![Effect::ApplyTime {
            start: request.start,
            end: request.end,
        }]
    }

    /// Focusable rows in display order.
    pub fn entries(&self) -> Vec<QuickSelectEntry> {
        let refresh = [QuickSelectEntry::RefreshPause, QuickSelectEntry::RefreshValue, QuickSelectEntry::RefreshUnit];
        if self.props.is_auto_refresh_only {
            return refresh.to_vec();
        }
        let mut entries = vec![
            QuickSelectEntry::Tense,
            QuickSelectEntry::Amount,
            QuickSelectEntry::Unit,
            QuickSelectEntry::Apply,
        ];
        entries.extend((0..self.props.commonly_used_ranges.len()).map(QuickSelectEntry::Common));
        entries.extend((0..self.props.recently_used_ranges.len()).map(QuickSelectEntry::Recent));
        for (panel, custom) in self.props.custom_panels.iter().enumerate() {
            entries.extend((0..custom.choices().len()).map(|choice| QuickSelectEntry::Custom { panel, choice }));
        }
        entries.extend(refresh);
        entries
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.entries().len() as isize;
        if count == 0 {
            return;
        }
        self.cursor = (self.cursor as isize + delta).rem_euclid(count) as usize;
    }

    pub fn set_cursor_entry(&mut self, entry: QuickSelectEntry) {
        if let Some(index) = self.entries().iter().position(|candidate| *candidate == entry) {
            self.cursor = index;
        }
    }

    /// Applies or toggles whatever `entry` stands for.
    pub fn activate(&mut self, entry: QuickSelectEntry) -> Vec<Effect> {
        match entry {
            QuickSelectEntry::Tense | QuickSelectEntry::Amount | QuickSelectEntry::Unit | QuickSelectEntry::Apply => {
                self.apply_time(self.editor.to_apply_time())
            }
            QuickSelectEntry::Common(index) => match self.props.commonly_used_ranges.get(index) {
                Some(range) => self.apply_time(range.to_apply_time()),
                None => Vec::new(),
            },
            QuickSelectEntry::Recent(index) => match self.props.recently_used_ranges.get(index) {
                Some(range) => self.apply_time(range.to_apply_time()),
                None => Vec::new(),
            },
            QuickSelectEntry::Custom { panel, choice } => {
                let request = self
                    .props
                    .custom_panels
                    .get(panel)
                    .and_then(|custom| custom.choices().into_iter().nth(choice))
                    .map(|choice| choice.request);
                match request {
                    Some(request) => self.apply_time(request),
                    None => Vec::new(),
                }
            }
            QuickSelectEntry::RefreshPause => {
                self.refresh_paused = !self.refresh_paused;
                self.refresh_effect()
            }
            QuickSelectEntry::RefreshValue | QuickSelectEntry::RefreshUnit => self.refresh_effect(),
        }
    }

    /// Left/Right on an editable entry.
    pub fn adjust(&mut self, entry: QuickSelectEntry, forward: bool) -> Vec<Effect> {
        match entry {
            QuickSelectEntry::Tense => self.editor.tense = self.editor.tense.toggled(),
            QuickSelectEntry::Amount => {
                self.editor.amount = if forward {
                    (self.editor.amount + 1).min(MAX_AMOUNT)
                } else {
                    self.editor.amount.saturating_sub(1).max(1)
                }
            }
            QuickSelectEntry::Unit => self.editor.unit = self.editor.unit.cycle(forward),
            QuickSelectEntry::RefreshPause => {
                self.refresh_paused = !self.refresh_paused;
                return self.refresh_effect();
            }
            QuickSelectEntry::RefreshValue => {
                self.refresh_value = if forward {
                    self.refresh_value + 1
                } else {
                    self.refresh_value.saturating_sub(1)
                };
                return self.refresh_effect();
            }
            QuickSelectEntry::RefreshUnit => {
                self.refresh_unit = self.refresh_unit.cycle(forward);
                return self.refresh_effect();
            }
            _ => {}
        }
        Vec::new()
    }

    /// Typing a digit into an amount field.
    pub fn push_digit(&mut self, entry: QuickSelectEntry, digit: u32) -> Vec<Effect> {
        match entry {
            QuickSelectEntry::Amount => {
                let next = self.editor.amount.saturating_mul(10).saturating_add(digit);
                self.editor.amount = if next > MAX_AMOUNT { digit.max(1) } else { next.max(1) };
                Vec::new()
            }
            QuickSelectEntry::RefreshValue => {
                let next = self.refresh_value.saturating_mul(10).saturating_add(u64::from(digit));
                self.refresh_value = if next > u64::from(MAX_AMOUNT) { u64::from(digit) } else { next };
                self.refresh_effect()
            }
            _ => Vec::new(),
        }
    }

    pub fn pop_digit(&mut self, entry: QuickSelectEntry) -> Vec<Effect> {
        match entry {
            QuickSelectEntry::Amount => {
                self.editor.amount = (self.editor.amount / 10).max(1);
                Vec::new()
            }
            QuickSelectEntry::RefreshValue => {
                self.refresh_value /= 10;
                self.refresh_effect()
            }
            _ => Vec::new(),
        }
    }

    fn refresh_effect(&self) -> Vec<Effect> {
        let interval = RefreshInterval {
            interval_ms: self.refresh_value * self.refresh_unit.millis(),
            is_paused: self.refresh_paused,
        };
        debug!(interval_ms = interval.interval_ms, is_paused = interval.is_paused, "refresh interval changed");
        vec![Effect::ApplyRefreshInterval(interval)]
    }
}

impl HasFocus for QuickSelectState {
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
    use crate::ui::components::quick_select::panels::{PanelChoice, QuickSelectPanel};
    use guidekit_types::{Tense, TimeUnit};

    fn open_state(props: QuickSelectProps) -> QuickSelectState {
        let mut state = QuickSelectState::new(props);
        state.toggle();
        assert!(state.is_open());
        state
    }

    #[test]
    fn apply_forwards_range_records_preset_and_closes() {
        let mut state = open_state(QuickSelectProps::default());
        let preset = QuickSelect::new(Tense::Last, 15, TimeUnit::Minutes);
        let effects = state.apply_time(preset.to_apply_time());

        assert_eq!(
            effects,
            vec![Effect::ApplyTime {
                start: "now-15m".into(),
                end: "now".into(),
            }]
        );
        assert_eq!(state.last_applied(), Some(preset));
        assert!(!state.is_open());
    }

    #[test]
    fn keep_open_leaves_popover_open_and_plain_ranges_keep_preset() {
        let mut state = open_state(QuickSelectProps::default());
        state.apply_time(QuickSelect::new(Tense::Next, 2, TimeUnit::Hours).to_apply_time());
        state.toggle();

        state.apply_time(ApplyTime::range("now/d", "now/d").keep_open(true));
        assert!(state.is_open());
        assert_eq!(state.last_applied(), Some(QuickSelect::new(Tense::Next, 2, TimeUnit::Hours)));
    }

    #[test]
    fn reopening_pins_previous_preset_in_editor() {
        let mut state = open_state(QuickSelectProps::default());
        state.adjust(QuickSelectEntry::Tense, true);
        state.push_digit(QuickSelectEntry::Amount, 0);
        state.adjust(QuickSelectEntry::Unit, true);
        let effects = state.activate(QuickSelectEntry::Apply);
        assert_eq!(
            effects,
            vec![Effect::ApplyTime {
                start: "now".into(),
                end: "now+150h".into(),
            }]
        );
        state.toggle();
        assert_eq!(state.editor(), QuickSelect::new(Tense::Next, 150, TimeUnit::Hours));
    }

    #[test]
    fn custom_panels_route_through_apply_time() {
        let props = QuickSelectProps {
            custom_panels: vec![QuickSelectPanel::new("Mine", || {
                vec![PanelChoice::new("Peek", ApplyTime::range("now", "now+5m").keep_open(true))]
            })],
            ..QuickSelectProps::default()
        };
        let mut state = open_state(props);
        let entry = QuickSelectEntry::Custom { panel: 0, choice: 0 };
        assert!(state.entries().contains(&entry));
        let effects = state.activate(entry);
        assert_eq!(
            effects,
            vec![Effect::ApplyTime {
                start: "now".into(),
                end: "now+5m".into(),
            }]
        );
        assert!(state.is_open());
    }

    #[test]
    fn auto_refresh_only_offers_refresh_control_and_clock_icon() {
        let props = QuickSelectProps {
            is_auto_refresh_only: true,
            ..QuickSelectProps::default()
        };
        let mut state = open_state(props);
        assert_eq!(
            state.entries(),
            vec![QuickSelectEntry::RefreshPause, QuickSelectEntry::RefreshValue, QuickSelectEntry::RefreshUnit]
        );
        assert_eq!(state.button_icon(), CLOCK_ICON);

        state.push_digit(QuickSelectEntry::RefreshValue, 5);
        let effects = state.adjust(QuickSelectEntry::RefreshUnit, true);
        assert_eq!(
            effects,
            vec![Effect::ApplyRefreshInterval(RefreshInterval {
                interval_ms: 300_000,
                is_paused: true,
            })]
        );
    }

    #[test]
    fn disabled_picker_never_opens_and_icon_tracks_pause() {
        let mut state = QuickSelectState::new(QuickSelectProps {
            is_disabled: true,
            ..QuickSelectProps::default()
        });
        state.toggle();
        assert!(!state.is_open());
        assert_eq!(state.button_icon(), CALENDAR_ICON);

        state.props.refresh.is_paused = false;
        assert_eq!(state.button_icon(), CLOCK_ICON);
    }

    #[test]
    fn refresh_interval_splits_into_largest_unit() {
        assert_eq!(RefreshUnit::split(7_200_000), (2, RefreshUnit::Hours));
        assert_eq!(RefreshUnit::split(90_000), (90, RefreshUnit::Seconds));
        assert_eq!(RefreshUnit::split(0), (0, RefreshUnit::Seconds));
    }
}
