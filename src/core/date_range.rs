// src/core/date_range.rs
//! Conversion between structured `YYYY-MM` date pairs and duration display strings

use chrono::Month;
use serde::{Deserialize, Serialize};
use tracing::trace;

const PRESENT: &str = "Present";

/// Structured side of a duration display string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_current: Option<bool>,
}

fn month_abbrev(month: u32) -> Option<&'static str> {
    let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
    Some(&month.name()[..3])
}

fn month_from_abbrev(token: &str) -> Option<u32> {
    let prefix: String = token.chars().take(3).collect::<String>().to_lowercase();
    (1..=12u32).find(|m| month_abbrev(*m).is_some_and(|abbrev| abbrev.to_lowercase() == prefix))
}

/// Renders `YYYY-MM` as `"Mon YYYY"`; a missing or invalid month renders the year alone.
fn display_point(date: &str) -> String {
    let date = date.trim();
    let mut parts = date.splitn(2, '-');
    let year = parts.next().unwrap_or_default().trim();
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        trace!(date, "date point not in YYYY-MM form, rendering verbatim");
        return date.to_string();
    }

    match parts
        .next()
        .and_then(|m| m.trim().parse::<u32>().ok())
        .and_then(month_abbrev)
    {
        Some(abbrev) => format!("{} {}", abbrev, year),
        None => year.to_string(),
    }
}

/// Builds a duration display string.
///
/// An ongoing range (`is_current`, or no end date) renders as `"{start} - Present"`.
/// A missing start renders whatever side is known.
pub fn encode(start: Option<&str>, end: Option<&str>, is_current: bool) -> String {
    let start = start.map(str::trim).filter(|s| !s.is_empty());
    let end = end.map(str::trim).filter(|s| !s.is_empty());

    match (start, end) {
        (Some(start), Some(end)) if !is_current => {
            format!("{} - {}", display_point(start), display_point(end))
        }
        (Some(start), _) => format!("{} - {}", display_point(start), PRESENT),
        (None, Some(end)) if !is_current => display_point(end),
        (None, _) => String::new(),
    }
}

/// Parses `"Mon YYYY"` (any month spelling sharing the abbreviation) or a bare year.
fn parse_point(side: &str) -> Option<String> {
    let tokens: Vec<&str> = side.split_whitespace().collect();
    match tokens.as_slice() {
        [year] if is_year(year) => Some(format!("{}-01", year)),
        [month, year] if is_year(year) => {
            let month = month_from_abbrev(month.trim_end_matches(['.', ',']))?;
            Some(format!("{}-{:02}", year, month))
        }
        _ => None,
    }
}

fn is_year(token: &str) -> bool {
    token.len() == 4 && token.chars().all(|c| c.is_ascii_digit())
}

/// Recovers the structured range from a display string. Never fails; sides that
/// cannot be parsed are left `None`.
pub fn decode(display: &str) -> DateRange {
    let normalized = display.replace(['\u{2013}', '\u{2014}'], "-");
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return DateRange::default();
    }

    let is_current = normalized.to_lowercase().contains("present");
    let (start_side, end_side) = match normalized.split_once('-') {
        Some((start, end)) => (start, Some(end)),
        None => (normalized, None),
    };

    let start_date = parse_point(start_side);
    let end_date = if is_current {
        None
    } else {
        end_side.and_then(parse_point)
    };

    if start_date.is_none() && !is_current {
        trace!(input = %normalized, "duration start could not be decoded");
    }

    let is_current = if is_current {
        Some(true)
    } else if end_date.is_some() {
        Some(false)
    } else {
        None
    };

    DateRange {
        start_date,
        end_date,
        is_current,
    }
}
