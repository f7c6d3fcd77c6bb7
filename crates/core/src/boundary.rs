//! Recurrence boundary phrases: "until ..." end dates and
//! "starting ..." start dates.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::recognizer::{last_day_of_month, DatePhraseRecognizer};
use crate::rules::{month_alternation, month_number, START_PHRASE, UNTIL_PHRASE};

/// End of the recurrence window, inclusive. The span covers the whole
/// "until ..." phrase so the sanitizer can drop it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndBoundary {
    pub ends_at: NaiveDateTime,
    pub span: (usize, usize),
}

/// Resolved "starting ..." phrase; takes precedence over any inferred due
/// date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartBoundary {
    pub starts_at: NaiveDateTime,
    pub span: (usize, usize),
}

/// Ordinal day in a relative month: "the 5th of next month".
static ORDINAL_OF_RELATIVE_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:the\s+)?(\d{1,2})(?:st|nd|rd|th)?\s+of\s+(next|this|current|coming)\s+month\b")
        .expect("valid regex")
});

/// "end of this month", "end of next month".
static END_OF_RELATIVE_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^end\s+of\s+(?:the\s+)?(next|this|current|coming)\s+month\b")
        .expect("valid regex")
});

/// Ordinal day in a named month: "the 5th of December".
static ORDINAL_OF_NAMED_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:the\s+)?(\d{{1,2}})(?:st|nd|rd|th)?\s+of\s+({})\b",
        month_alternation()
    ))
    .expect("valid regex")
});

/// Named month followed by a day: "Dec 31st", "August 31".
static NAMED_MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^({})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b",
        month_alternation()
    ))
    .expect("valid regex")
});

static BARE_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^({})\b", month_alternation())).expect("valid regex")
});

/// Resolve the first "until/till ..." phrase to an inclusive end instant,
/// stamped with end-of-day (23:59:59.999). The explicit month-offset cases
/// are tried before delegating the remainder to the recognizer; the first
/// successful resolution wins.
pub fn resolve_end<R: DatePhraseRecognizer>(
    title: &str,
    now: NaiveDateTime,
    recognizer: &R,
) -> Option<EndBoundary> {
    let caps = UNTIL_PHRASE.captures(title)?;
    let whole = caps.get(0)?;
    let remainder = caps.get(1)?;

    let date = resolve_end_date(remainder.as_str(), now, recognizer)?;
    Some(EndBoundary {
        ends_at: date.and_time(end_of_day()),
        span: (whole.start(), whole.end()),
    })
}

fn resolve_end_date<R: DatePhraseRecognizer>(
    remainder: &str,
    now: NaiveDateTime,
    recognizer: &R,
) -> Option<NaiveDate> {
    let remainder = remainder.trim();
    let today = now.date();

    if let Some(caps) = ORDINAL_OF_RELATIVE_MONTH.captures(remainder) {
        let day: u32 = caps[1].parse().ok()?;
        let anchor = shift_month(today, &caps[2])?;
        return month_day_with_rollover(anchor, day);
    }

    if let Some(caps) = END_OF_RELATIVE_MONTH.captures(remainder) {
        let anchor = shift_month(today, &caps[1])?;
        return last_day_of_month(anchor.year(), anchor.month());
    }

    if let Some(caps) = ORDINAL_OF_NAMED_MONTH.captures(remainder) {
        let day: u32 = caps[1].parse().ok()?;
        let anchor = nearest_future_month(today, month_number(&caps[2])?)?;
        return month_day_with_rollover(anchor, day);
    }

    if let Some(caps) = NAMED_MONTH_DAY.captures(remainder) {
        let day: u32 = caps[2].parse().ok()?;
        let anchor = nearest_future_month(today, month_number(&caps[1])?)?;
        return month_day_with_rollover(anchor, day);
    }

    if let Some(caps) = BARE_MONTH.captures(remainder) {
        return nearest_future_month(today, month_number(&caps[1])?);
    }

    recognizer
        .recognize(remainder, now)
        .ok()
        .and_then(|spans| spans.into_iter().next())
        .map(|span| span.resolved.date())
}

/// Resolve the first "starting/beginning/from ..." phrase through the
/// recognizer. Only the first such phrase is honored.
pub fn resolve_start<R: DatePhraseRecognizer>(
    title: &str,
    now: NaiveDateTime,
    recognizer: &R,
) -> Option<StartBoundary> {
    let found = START_PHRASE.find(title)?;
    let starts_at = recognizer
        .recognize(found.as_str(), now)
        .ok()
        .and_then(|spans| spans.into_iter().next())
        .map(|span| span.resolved)?;
    Some(StartBoundary {
        starts_at,
        span: (found.start(), found.end()),
    })
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid time")
}

/// "this"/"current" keep the calendar month; "next"/"coming" advance one.
fn shift_month(today: NaiveDate, qualifier: &str) -> Option<NaiveDate> {
    match qualifier.to_ascii_lowercase().as_str() {
        "next" | "coming" => today.checked_add_months(Months::new(1)),
        _ => Some(today),
    }
}

/// First day of the nearest future occurrence of `month`, advancing a year
/// when it has already passed.
fn nearest_future_month(today: NaiveDate, month: u32) -> Option<NaiveDate> {
    let year = if month >= today.month() {
        today.year()
    } else {
        today.year() + 1
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// The requested day inside the anchor month, advancing month-by-month past
/// months that lack it.
fn month_day_with_rollover(anchor: NaiveDate, day: u32) -> Option<NaiveDate> {
    if !(1..=31).contains(&day) {
        return None;
    }
    let mut cursor = NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), 1)?;
    for _ in 0..12 {
        if let Some(date) = NaiveDate::from_ymd_opt(cursor.year(), cursor.month(), day) {
            return Some(date);
        }
        cursor = cursor.checked_add_months(Months::new(1))?;
    }
    None
}
