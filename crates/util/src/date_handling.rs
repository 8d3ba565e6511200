//! # Date Handling Utilities
//!
//! Labels for date ranges expressed in date math (`now-15m`) or as RFC 3339
//! timestamps. Used for the recently-used list of the quick select popover
//! and for the date picker's summary line.

use chrono::{DateTime, NaiveDate};
use guidekit_types::{DurationRange, Tense, TimeUnit};

/// Default `strftime` format for absolute endpoints.
pub const DEFAULT_DATE_FORMAT: &str = "%b %e, %Y @ %H:%M:%S";

/// A parsed `now±N<unit>` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeOffset {
    pub tense: Tense,
    pub amount: u64,
    pub unit: TimeUnit,
}

/// Parses `now-15m` / `now+2d` style expressions.
///
/// Rounded expressions (`now-1d/d`) and bare `now` return `None`.
pub fn parse_relative(value: &str) -> Option<RelativeOffset> {
    let rest = value.trim().strip_prefix("now")?;
    let mut chars = rest.chars();
    let tense = match chars.next()? {
        '-' => Tense::Last,
        '+' => Tense::Next,
        _ => return None,
    };
    let body = chars.as_str();
    let unit_start = body.find(|c: char| !c.is_ascii_digit())?;
    let (digits, unit) = body.split_at(unit_start);
    let amount = digits.parse().ok()?;
    let unit = unit.parse().ok()?;
    Some(RelativeOffset { tense, amount, unit })
}

/// Produces a human label for a range.
///
/// Resolution order:
/// 1. a labelled entry in `known_ranges` with the same endpoints,
/// 2. "Last N units" / "Next N units" for symmetric relative ranges,
/// 3. both endpoints rendered individually and joined with an arrow.
pub fn pretty_duration(start: &str, end: &str, known_ranges: &[DurationRange], date_format: &str) -> String {
    if let Some(label) = known_ranges
        .iter()
        .find(|range| range.start == start && range.end == end)
        .and_then(|range| range.label.clone())
    {
        return label;
    }

    match (parse_relative(start), end.trim(), start.trim(), parse_relative(end)) {
        (Some(offset), "now", _, _) if offset.tense == Tense::Last => {
            return format!("Last {} {}", offset.amount, offset.unit.label(offset.amount));
        }
        (_, _, "now", Some(offset)) if offset.tense == Tense::Next => {
            return format!("Next {} {}", offset.amount, offset.unit.label(offset.amount));
        }
        _ => {}
    }

    format!(
        "{} → {}",
        pretty_endpoint(start, date_format),
        pretty_endpoint(end, date_format)
    )
}

/// Renders a single endpoint.
pub fn pretty_endpoint(value: &str, date_format: &str) -> String {
    let trimmed = value.trim();
    if trimmed == "now" {
        return "now".to_string();
    }
    if let Some(offset) = parse_relative(trimmed) {
        let unit = offset.unit.label(offset.amount);
        return match offset.tense {
            Tense::Last => format!("~ {} {} ago", offset.amount, unit),
            Tense::Next => format!("~ in {} {}", offset.amount, unit),
        };
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
        return date_time.format(date_format).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        && let Some(date_time) = date.and_hms_opt(0, 0, 0)
    {
        return date_time.format(date_format).to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_relative_offsets() {
        assert_eq!(
            parse_relative("now-15m"),
            Some(RelativeOffset {
                tense: Tense::Last,
                amount: 15,
                unit: TimeUnit::Minutes
            })
        );
        assert_eq!(parse_relative("now+1M").map(|o| o.unit), Some(TimeUnit::Months));
        assert_eq!(parse_relative("now"), None);
        assert_eq!(parse_relative("now-1d/d"), None);
        assert_eq!(parse_relative("now-m"), None);
    }

    #[test]
    fn pretty_duration_prefers_known_labels() {
        let known = vec![DurationRange::labeled("now/d", "now/d", "Today")];
        assert_eq!(pretty_duration("now/d", "now/d", &known, DEFAULT_DATE_FORMAT), "Today");
    }

    #[test]
    fn pretty_duration_describes_relative_ranges() {
        assert_eq!(pretty_duration("now-15m", "now", &[], DEFAULT_DATE_FORMAT), "Last 15 minutes");
        assert_eq!(pretty_duration("now", "now+1d", &[], DEFAULT_DATE_FORMAT), "Next 1 day");
        assert_eq!(
            pretty_duration("now-2h", "now-1h", &[], DEFAULT_DATE_FORMAT),
            "~ 2 hours ago → ~ 1 hour ago"
        );
    }

    #[test]
    fn pretty_duration_formats_absolute_endpoints() {
        let label = pretty_duration("2024-03-01T10:00:00Z", "2024-03-02", &[], "%Y/%m/%d %H:%M");
        assert_eq!(label, "2024/03/01 10:00 → 2024/03/02 00:00");
    }
}
