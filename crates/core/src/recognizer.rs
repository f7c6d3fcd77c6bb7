//! Generic date/time phrase recognition. The parser only depends on the
//! [`DatePhraseRecognizer`] trait; [`BuiltinRecognizer`] is the stock
//! implementation covering the English phrases the task parser cares about.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::rules::{month_alternation, month_number, weekday_from_name, WEEKDAY_NAMES};

/// One recognized date/time phrase: the matched source span and the instant
/// it resolves to relative to the reference time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub resolved: NaiveDateTime,
}

#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("date phrase recognizer unavailable: {0}")]
    Unavailable(String),
}

/// Scans free text for date/time phrases, returned in order of occurrence.
/// Callers treat an error as "no phrases found" and move on.
pub trait DatePhraseRecognizer {
    fn recognize(&self, text: &str, now: NaiveDateTime)
        -> Result<Vec<DateSpan>, RecognizerError>;
}

struct Patterns {
    iso_date: Regex,
    relative_day: Regex,
    in_n_units: Regex,
    next_unit: Regex,
    weekday: Regex,
    month_day: Regex,
    day_of_month: Regex,
    month_edge: Regex,
    bare_month: Regex,
    time_of_day: Regex,
}

static PATTERNS: Lazy<Patterns> = Lazy::new(|| {
    let months = month_alternation();
    let weekdays = WEEKDAY_NAMES.join("|");
    Patterns {
        iso_date: Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("valid regex"),
        relative_day: Regex::new(r"(?i)\b(today|tomorrow)\b").expect("valid regex"),
        in_n_units: Regex::new(r"(?i)\bin\s+(\d+)\s+(day|week|month|year)s?\b")
            .expect("valid regex"),
        next_unit: Regex::new(r"(?i)\bnext\s+(week|month|year)\b").expect("valid regex"),
        weekday: Regex::new(&format!(r"(?i)\b(?:next\s+)?({})s?\b", weekdays))
            .expect("valid regex"),
        month_day: Regex::new(&format!(
            r"(?i)\b({})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b",
            months
        ))
        .expect("valid regex"),
        day_of_month: Regex::new(&format!(
            r"(?i)\b(?:the\s+)?(\d{{1,2}})(?:st|nd|rd|th)?\s+of\s+({})\b",
            months
        ))
        .expect("valid regex"),
        month_edge: Regex::new(
            r"(?i)\b(end|mid(?:dle)?)\s+of\s+(?:the\s+)?(?:(this|next|current|coming)\s+)?month\b",
        )
        .expect("valid regex"),
        bare_month: Regex::new(&format!(r"(?i)\b({})\b", months)).expect("valid regex"),
        time_of_day: Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b|\b(\d{1,2}):(\d{2})\b")
            .expect("valid regex"),
    }
});

/// Regex-driven recognizer for common English date/time phrases: ISO dates,
/// today/tomorrow, "in N days", "next week", weekday names, "Dec 31st",
/// "20th of next month" style ordinals, month names, month edges
/// ("end of month"), and bare clock times.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRecognizer;

impl DatePhraseRecognizer for BuiltinRecognizer {
    fn recognize(
        &self,
        text: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<DateSpan>, RecognizerError> {
        Ok(scan(text, now))
    }
}

fn scan(text: &str, now: NaiveDateTime) -> Vec<DateSpan> {
    let mut candidates: Vec<DateSpan> = Vec::new();
    let mut push = |start: usize, end: usize, resolved: Option<NaiveDateTime>| {
        if let Some(resolved) = resolved {
            candidates.push(DateSpan {
                start,
                end,
                text: text[start..end].to_string(),
                resolved,
            });
        }
    };

    let today = now.date();
    let midnight = |date: NaiveDate| date.and_time(NaiveTime::MIN);

    for caps in PATTERNS.iso_date.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().unwrap_or(0),
            caps[2].parse().unwrap_or(0),
            caps[3].parse().unwrap_or(0),
        );
        push(m.start(), m.end(), date.map(midnight));
    }

    for caps in PATTERNS.relative_day.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let date = if caps[1].eq_ignore_ascii_case("today") {
            Some(today)
        } else {
            today.checked_add_days(Days::new(1))
        };
        push(m.start(), m.end(), date.map(midnight));
    }

    for caps in PATTERNS.in_n_units.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let amount: u32 = match caps[1].parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        let resolved = match caps[2].to_ascii_lowercase().as_str() {
            "day" => now.checked_add_days(Days::new(u64::from(amount))),
            "week" => now.checked_add_days(Days::new(u64::from(amount) * 7)),
            "month" => now.checked_add_months(Months::new(amount)),
            "year" => now.checked_add_months(Months::new(amount.saturating_mul(12))),
            _ => None,
        };
        push(m.start(), m.end(), resolved);
    }

    for caps in PATTERNS.next_unit.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let date = match caps[1].to_ascii_lowercase().as_str() {
            "week" => today.checked_add_days(Days::new(7)),
            "month" => today.checked_add_months(Months::new(1)),
            "year" => today.checked_add_months(Months::new(12)),
            _ => None,
        };
        push(m.start(), m.end(), date.map(midnight));
    }

    for caps in PATTERNS.weekday.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let resolved = weekday_from_name(&caps[1]).map(|w| midnight(next_weekday(today, w)));
        push(m.start(), m.end(), resolved);
    }

    for caps in PATTERNS.month_day.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let day: u32 = match caps[2].parse() {
            Ok(d) => d,
            Err(_) => continue,
        };
        let resolved = month_number(&caps[1])
            .and_then(|month| upcoming_month_day(today, month, day))
            .map(midnight);
        push(m.start(), m.end(), resolved);
    }

    for caps in PATTERNS.day_of_month.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let day: u32 = match caps[1].parse() {
            Ok(d) => d,
            Err(_) => continue,
        };
        let resolved = month_number(&caps[2])
            .and_then(|month| upcoming_month_day(today, month, day))
            .map(midnight);
        push(m.start(), m.end(), resolved);
    }

    for caps in PATTERNS.month_edge.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let base = match caps.get(2).map(|c| c.as_str().to_ascii_lowercase()) {
            Some(ref q) if q == "next" || q == "coming" => {
                today.checked_add_months(Months::new(1))
            }
            _ => Some(today),
        };
        let resolved = base.and_then(|anchor| {
            if caps[1].eq_ignore_ascii_case("end") {
                last_day_of_month(anchor.year(), anchor.month())
            } else {
                NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), 15)
            }
        });
        push(m.start(), m.end(), resolved.map(midnight));
    }

    for caps in PATTERNS.bare_month.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let resolved = month_number(&caps[1]).and_then(|month| {
            let year = if month >= today.month() {
                today.year()
            } else {
                today.year() + 1
            };
            NaiveDate::from_ymd_opt(year, month, 1)
        });
        push(m.start(), m.end(), resolved.map(midnight));
    }

    for caps in PATTERNS.time_of_day.captures_iter(text) {
        let m = caps.get(0).expect("whole match");
        let resolved = if let Some(hour) = caps.get(1) {
            let hour: u32 = match hour.as_str().parse() {
                Ok(h) => h,
                Err(_) => continue,
            };
            let minute: u32 = caps
                .get(2)
                .and_then(|c| c.as_str().parse().ok())
                .unwrap_or(0);
            let hour = to_24_hour(hour, &caps[3]);
            NaiveTime::from_hms_opt(hour, minute, 0)
        } else {
            let hour: u32 = match caps[4].parse() {
                Ok(h) => h,
                Err(_) => continue,
            };
            let minute: u32 = match caps[5].parse() {
                Ok(mn) => mn,
                Err(_) => continue,
            };
            NaiveTime::from_hms_opt(hour, minute, 0)
        };
        push(m.start(), m.end(), resolved.map(|t| today.and_time(t)));
    }

    dedup_by_position(candidates)
}

/// 12-hour to 24-hour conversion: 12am is midnight, 12pm is noon.
pub fn to_24_hour(hour: u32, meridian: &str) -> u32 {
    match meridian.to_ascii_lowercase().as_str() {
        "pm" if hour < 12 => hour + 12,
        "am" if hour == 12 => 0,
        _ => hour,
    }
}

/// Next occurrence of `target` strictly after `from`.
pub fn next_weekday(from: NaiveDate, target: Weekday) -> NaiveDate {
    let mut ahead = i64::from(target.num_days_from_monday())
        - i64::from(from.weekday().num_days_from_monday());
    if ahead <= 0 {
        ahead += 7;
    }
    from + chrono::Duration::days(ahead)
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    next.checked_sub_days(Days::new(1))
}

/// Nearest occurrence of month/day on or after `today`; skips ahead a year
/// when the date has already passed, and gives up when the day never exists
/// in that month (e.g. February 30th).
fn upcoming_month_day(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
    match this_year {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

/// Sort by position and drop spans overlapping an earlier (or longer) one,
/// so "31st of December" shadows the bare "December" inside it.
fn dedup_by_position(mut spans: Vec<DateSpan>) -> Vec<DateSpan> {
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    let mut kept: Vec<DateSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if kept
            .iter()
            .all(|k| span.start >= k.end || span.end <= k.start)
        {
            kept.push(span);
        }
    }
    kept
}
