//! Date resolution for `due:` and `t:` values.
//!
//! Turns ISO dates and relative expressions (`today`, `tom`, `fri`, `nw`,
//! `11dec`, `3d`, ...) into calendar dates against an explicit reference
//! date. Everything here is pure; the caller decides what "today" is.

use std::sync::LazyLock;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use regex::Regex;

use crate::error::ParseFailure;
use crate::fields::RecurrenceUnit;

/// On-disk date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static ISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static regex"));
static OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,4})([dwmy])$").expect("static regex"));
static DAY_MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})([a-z]{3})(\d{4})?$").expect("static regex"));

const WEEKDAYS: [(&str, Weekday); 14] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
    ("mon", Weekday::Mon),
    ("tue", Weekday::Tue),
    ("wed", Weekday::Wed),
    ("thu", Weekday::Thu),
    ("fri", Weekday::Fri),
    ("sat", Weekday::Sat),
    ("sun", Weekday::Sun),
];

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    if !ISO_RE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Resolve a date token relative to `reference`.
///
/// Supports:
/// - "YYYY-MM-DD"
/// - "tod"/"today", "tom"/"tomorrow"
/// - weekday names, short or long (next occurrence strictly after `reference`)
/// - "nw"/"nextweek" (next Monday), "nm"/"nextmonth" (first of next month)
/// - "eow"/"eom" (end of this week / month)
/// - "11dec", "1dec2027" (rolls to next year if already past and no year given)
/// - "3d", "2w", "1m", "1y" offsets
pub fn resolve(token: &str, reference: NaiveDate) -> Result<NaiveDate, ParseFailure> {
    let fail = || ParseFailure::Date(token.to_string());
    let s = token.trim().to_lowercase();

    if let Some(d) = parse_iso(&s) {
        return Ok(d);
    }

    let simple = match s.as_str() {
        "tod" | "today" => Some(reference),
        "tom" | "tomorrow" => reference.succ_opt(),
        "nw" | "nextweek" => Some(next_weekday(reference, Weekday::Mon)),
        "nm" | "nextmonth" => first_of_next_month(reference),
        "eow" => {
            let (_, end) = start_end_of_week(reference);
            Some(end)
        }
        "eom" => first_of_next_month(reference).and_then(|d| d.pred_opt()),
        _ => None,
    };
    if let Some(d) = simple {
        return Ok(d);
    }

    if let Some(&(_, weekday)) = WEEKDAYS.iter().find(|(name, _)| *name == s) {
        return Ok(next_weekday(reference, weekday));
    }

    if let Some(caps) = OFFSET_RE.captures(&s) {
        let amount: u32 = caps[1].parse().map_err(|_| fail())?;
        let unit = match &caps[2] {
            "d" => RecurrenceUnit::Day,
            "w" => RecurrenceUnit::Week,
            "m" => RecurrenceUnit::Month,
            _ => RecurrenceUnit::Year,
        };
        return add_interval(reference, amount, unit).ok_or_else(fail);
    }

    if let Some(caps) = DAY_MONTH_RE.captures(&s) {
        let day: u32 = caps[1].parse().map_err(|_| fail())?;
        let month = MONTHS
            .iter()
            .position(|m| *m == &caps[2])
            .ok_or_else(fail)? as u32
            + 1;
        return match caps.get(3) {
            Some(y) => {
                let year: i32 = y.as_str().parse().map_err(|_| fail())?;
                NaiveDate::from_ymd_opt(year, month, day).ok_or_else(fail)
            }
            None => {
                let mut year = reference.year();
                if (month, day) < (reference.month(), reference.day()) {
                    year += 1;
                }
                NaiveDate::from_ymd_opt(year, month, day).ok_or_else(fail)
            }
        };
    }

    Err(fail())
}

/// Add a calendar interval. Months and years clamp to the end of the target
/// month (Jan 31 + 1 month is the last day of February).
pub fn add_interval(date: NaiveDate, amount: u32, unit: RecurrenceUnit) -> Option<NaiveDate> {
    match unit {
        RecurrenceUnit::Day => date.checked_add_days(Days::new(u64::from(amount))),
        RecurrenceUnit::Week => date.checked_add_days(Days::new(u64::from(amount) * 7)),
        RecurrenceUnit::Month => date.checked_add_months(Months::new(amount)),
        RecurrenceUnit::Year => date.checked_add_months(Months::new(amount.checked_mul(12)?)),
    }
}

/// Next date falling on `target`, strictly after `from`.
pub fn next_weekday(from: NaiveDate, target: Weekday) -> NaiveDate {
    let current = from.weekday().num_days_from_monday();
    let wanted = target.num_days_from_monday();
    let mut ahead = (wanted + 7 - current) % 7;
    if ahead == 0 {
        ahead = 7;
    }
    from + chrono::Duration::days(i64::from(ahead))
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Calculate the start and end dates of the ISO week (Monday to Sunday) containing `today`.
pub fn start_end_of_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = i64::from(today.weekday().num_days_from_monday());
    let start = today - chrono::Duration::days(weekday);
    let end = start + chrono::Duration::days(6);
    (start, end)
}

/// Due column text for the task table. Dates within the coming week use the
/// same words `resolve` accepts; anything further out is shown as ISO.
pub fn due_label(due: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(due) = due else {
        return "-".into();
    };
    match (due - today).num_days() {
        0 => "today".into(),
        1 => "tom".into(),
        -1 => "yesterday".into(),
        2..=6 => WEEKDAYS[7..]
            .iter()
            .find(|(_, w)| *w == due.weekday())
            .map(|(name, _)| (*name).to_string())
            .unwrap_or_else(|| format_iso(due)),
        n if n < 0 => format!("{}d overdue", -n),
        _ => format_iso(due),
    }
}
