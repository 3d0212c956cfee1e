use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::warn;

/// "March 15, 2024". Full month names only; "Mar 15, 2024" does not match.
/// Word boundaries and month-name case folding are ASCII-only, so a date
/// written flush against CJK or accented text is still found.
static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?-u:\b)((?i-u:January|February|March|April|May|June|July|August|September|October|November|December))\s+([0-9]{1,2}),\s*([0-9]{4})(?-u:\b)",
    )
    .expect("month-day-year pattern is valid")
});

/// "03/15/2024" or "3/1/2024". Ranges are not checked.
static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}(?-u:\b)")
        .expect("numeric date pattern is valid")
});

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// A date found in an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDate {
    /// Verbatim substring of the instruction.
    pub fragment: String,
    /// `MM/DD/YYYY` form to type into the control.
    pub normalized: String,
}

/// Find the first date in `instruction`, long form tried before numeric.
/// Returns `None` when nothing matches or the long-form date is not a real
/// calendar day.
pub fn extract_date(instruction: &str) -> Option<ExtractedDate> {
    let fragment = MONTH_DAY_YEAR
        .find(instruction)
        .or_else(|| NUMERIC_DATE.find(instruction))?
        .as_str();

    let normalized = normalize_date(fragment)?;
    Some(ExtractedDate {
        fragment: fragment.to_string(),
        normalized,
    })
}

/// Numeric dates pass through untouched; long-form dates become zero-padded
/// `MM/DD/YYYY`.
pub fn normalize_date(fragment: &str) -> Option<String> {
    if NUMERIC_DATE.is_match(fragment) {
        return Some(fragment.to_string());
    }

    let caps = MONTH_DAY_YEAR.captures(fragment)?;
    match parse_month_day_year(&caps[1], &caps[2], &caps[3]) {
        Some(date) => Some(format!(
            "{:02}/{:02}/{:04}",
            date.month(),
            date.day(),
            date.year()
        )),
        None => {
            warn!(fragment, "could not parse date string");
            None
        }
    }
}

fn parse_month_day_year(month: &str, day: &str, year: &str) -> Option<NaiveDate> {
    let month = month.to_lowercase();
    let month = MONTHS.iter().position(|m| *m == month)? as u32 + 1;
    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
