//! Due date/time extraction: clock-time phrases, weekday references, and
//! monthly ordinal day-of-month references, with calendar-safe rollover.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::recognizer::{next_weekday, to_24_hour};
use crate::rules::{weekday_from_name, CLOCK_TIME, ORDINAL_DAY, WEEKDAY_PHRASE};

/// An explicit "at 6pm" style clock time found in the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub span: (usize, usize),
}

impl ClockTime {
    pub fn as_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour.min(23), self.minute.min(59), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

/// First "(at|by) H(:MM)? (am|pm)?" phrase in the text. Without a meridian
/// the hour is taken literally; nonsense hours are dropped.
pub fn extract_clock_time(text: &str) -> Option<ClockTime> {
    let caps = CLOCK_TIME.captures(text)?;
    let whole = caps.get(0)?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    if let Some(meridian) = caps.get(3) {
        hour = to_24_hour(hour, meridian.as_str());
    }
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(ClockTime {
        hour,
        minute,
        span: (whole.start(), whole.end()),
    })
}

/// First "on Mondays" / "every Tuesday" reference in the text.
pub fn extract_weekday(text: &str) -> Option<Weekday> {
    let caps = WEEKDAY_PHRASE.captures(text)?;
    weekday_from_name(&caps[1])
}

/// First "the 5th" style ordinal day reference in the text.
pub fn extract_ordinal_day(text: &str) -> Option<u32> {
    let caps = ORDINAL_DAY.captures(text)?;
    caps[1].parse().ok()
}

/// Next calendar date with the given day-of-month, strictly after `today`.
/// Months that lack the day (the 31st in February) are skipped entirely
/// rather than clamped to an earlier day.
pub fn next_day_of_month(today: NaiveDate, day: u32) -> Option<NaiveDate> {
    if !(1..=31).contains(&day) {
        return None;
    }
    let mut anchor = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
    if today.day() >= day {
        anchor = anchor.checked_add_months(Months::new(1))?;
    }
    // Every day 1..=31 occurs at least once in any 12-month window.
    for _ in 0..12 {
        if let Some(date) = NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), day) {
            if date > today {
                return Some(date);
            }
        }
        anchor = anchor.checked_add_months(Months::new(1))?;
    }
    None
}

/// Tomorrow at the given clock time, defaulting to 09:00. The fallback due
/// date for recurring-daily tasks and for titles with no temporal content.
pub fn tomorrow_at(now: NaiveDateTime, clock: Option<ClockTime>) -> NaiveDateTime {
    let date = now
        .date()
        .checked_add_days(Days::new(1))
        .unwrap_or_else(|| now.date());
    let time = clock
        .map(|c| c.as_time())
        .unwrap_or_else(|| NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"));
    date.and_time(time)
}

/// Overwrite the hour/minute of a resolved due instant with an explicit
/// clock-time phrase, when one was present.
pub fn apply_clock_override(due: NaiveDateTime, clock: Option<ClockTime>) -> NaiveDateTime {
    match clock {
        Some(c) => due.date().and_time(c.as_time()),
        None => due,
    }
}

/// Next strictly-future occurrence of the weekday, at the clock time if one
/// was stated and midnight otherwise.
pub fn weekday_due(now: NaiveDateTime, weekday: Weekday, clock: Option<ClockTime>) -> NaiveDateTime {
    let date = next_weekday(now.date(), weekday);
    let time = clock.map(|c| c.as_time()).unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}
