//! Date-range model shared by the quick select popover and its host.
//!
//! Range endpoints are kept as strings in date-math form (`now`, `now-15m`,
//! `now+1d`, `now/d`) or as RFC 3339 timestamps. Interpreting them is left to
//! the host; this crate only builds and labels them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether a quick select looks backwards or forwards from now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tense {
    #[default]
    Last,
    Next,
}

impl Tense {
    pub fn toggled(self) -> Self {
        match self {
            Self::Last => Self::Next,
            Self::Next => Self::Last,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Last => "Last",
            Self::Next => "Next",
        }
    }
}

/// Date-math time units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    #[serde(rename = "s")]
    Seconds,
    #[default]
    #[serde(rename = "m")]
    Minutes,
    #[serde(rename = "h")]
    Hours,
    #[serde(rename = "d")]
    Days,
    #[serde(rename = "w")]
    Weeks,
    #[serde(rename = "M")]
    Months,
    #[serde(rename = "y")]
    Years,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown time unit: {0:?}")]
pub struct ParseTimeUnitError(pub String);

impl TimeUnit {
    pub const ALL: [TimeUnit; 7] = [
        Self::Seconds,
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Weeks,
        Self::Months,
        Self::Years,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Minutes => "m",
            Self::Hours => "h",
            Self::Days => "d",
            Self::Weeks => "w",
            Self::Months => "M",
            Self::Years => "y",
        }
    }

    /// Human label, pluralized unless `amount == 1`.
    pub fn label(self, amount: u64) -> &'static str {
        let (singular, plural) = match self {
            Self::Seconds => ("second", "seconds"),
            Self::Minutes => ("minute", "minutes"),
            Self::Hours => ("hour", "hours"),
            Self::Days => ("day", "days"),
            Self::Weeks => ("week", "weeks"),
            Self::Months => ("month", "months"),
            Self::Years => ("year", "years"),
        };
        if amount == 1 { singular } else { plural }
    }

    /// Cycles through `ALL`, wrapping at either end.
    pub fn cycle(self, forward: bool) -> Self {
        let idx = Self::ALL.iter().position(|u| *u == self).unwrap_or(0);
        let len = Self::ALL.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Self::ALL[next]
    }
}

impl FromStr for TimeUnit {
    type Err = ParseTimeUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|unit| unit.symbol() == s)
            .ok_or_else(|| ParseTimeUnitError(s.to_string()))
    }
}

/// A relative preset such as "Last 15 minutes".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuickSelect {
    pub tense: Tense,
    pub amount: u32,
    pub unit: TimeUnit,
}

impl Default for QuickSelect {
    fn default() -> Self {
        Self {
            tense: Tense::Last,
            amount: 15,
            unit: TimeUnit::Minutes,
        }
    }
}

impl QuickSelect {
    pub fn new(tense: Tense, amount: u32, unit: TimeUnit) -> Self {
        Self { tense, amount, unit }
    }

    /// Date-math `(start, end)` for this preset.
    pub fn to_range(&self) -> (String, String) {
        let offset = format!("{}{}", self.amount, self.unit.symbol());
        match self.tense {
            Tense::Last => (format!("now-{offset}"), "now".to_string()),
            Tense::Next => ("now".to_string(), format!("now+{offset}")),
        }
    }

    /// The apply request produced by choosing this preset.
    pub fn to_apply_time(&self) -> ApplyTime {
        let (start, end) = self.to_range();
        ApplyTime::range(start, end).with_quick_select(*self)
    }
}

impl fmt::Display for QuickSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.tense.label(),
            self.amount,
            self.unit.label(u64::from(self.amount))
        )
    }
}

/// A named or unnamed `(start, end)` pair offered as a preset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DurationRange {
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DurationRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            label: None,
        }
    }

    pub fn labeled(start: impl Into<String>, end: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            label: Some(label.into()),
        }
    }

    /// Two ranges are the same entry when their endpoints match; labels are
    /// presentation only.
    pub fn same_span(&self, other: &DurationRange) -> bool {
        self.start == other.start && self.end == other.end
    }

    pub fn to_apply_time(&self) -> ApplyTime {
        ApplyTime::range(self.start.clone(), self.end.clone())
    }
}

/// A request to apply a range, as issued by any quick select panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyTime {
    pub start: String,
    pub end: String,
    /// Preset that produced the range, remembered as the previous quick select.
    pub quick_select: Option<QuickSelect>,
    /// Leave the popover open after applying.
    pub keep_popover_open: bool,
}

impl ApplyTime {
    pub fn range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            quick_select: None,
            keep_popover_open: false,
        }
    }

    pub fn with_quick_select(mut self, quick_select: QuickSelect) -> Self {
        self.quick_select = Some(quick_select);
        self
    }

    pub fn keep_open(mut self, keep_popover_open: bool) -> Self {
        self.keep_popover_open = keep_popover_open;
        self
    }
}

/// Auto-refresh settings for the date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshInterval {
    pub interval_ms: u64,
    pub is_paused: bool,
}

impl Default for RefreshInterval {
    fn default() -> Self {
        Self {
            interval_ms: 0,
            is_paused: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_select_builds_date_math() {
        let last = QuickSelect::new(Tense::Last, 15, TimeUnit::Minutes);
        assert_eq!(last.to_range(), ("now-15m".to_string(), "now".to_string()));
        let next = QuickSelect::new(Tense::Next, 2, TimeUnit::Months);
        assert_eq!(next.to_range(), ("now".to_string(), "now+2M".to_string()));
        assert_eq!(next.to_apply_time().quick_select, Some(next));
    }

    #[test]
    fn quick_select_label_pluralizes() {
        assert_eq!(QuickSelect::new(Tense::Last, 1, TimeUnit::Hours).to_string(), "Last 1 hour");
        assert_eq!(QuickSelect::new(Tense::Next, 3, TimeUnit::Days).to_string(), "Next 3 days");
    }

    #[test]
    fn time_unit_symbols_round_trip_and_cycle() {
        assert_eq!("M".parse::<TimeUnit>(), Ok(TimeUnit::Months));
        assert!("q".parse::<TimeUnit>().is_err());
        assert_eq!(TimeUnit::Years.cycle(true), TimeUnit::Seconds);
        assert_eq!(TimeUnit::Seconds.cycle(false), TimeUnit::Years);
    }
}
