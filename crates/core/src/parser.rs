//! The task phrase parser: a pure function of (title, reference instant)
//! producing a fully-populated [`ParseResult`]. Four passes cooperate over
//! the same immutable input: recurrence detection, temporal extraction,
//! boundary resolution, and title sanitization.

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::boundary::{self, EndBoundary, StartBoundary};
use crate::model::{ParseResult, ParseWarning, RecurrencePattern};
use crate::recognizer::{BuiltinRecognizer, DatePhraseRecognizer};
use crate::recurrence::{self, Detection};
use crate::sanitize;
use crate::temporal::{self, ClockTime};

/// Stateless parser, safe to share across threads; the recognizer is the
/// only swappable collaborator.
#[derive(Debug, Clone, Default)]
pub struct TaskPhraseParser<R = BuiltinRecognizer> {
    recognizer: R,
}

impl TaskPhraseParser<BuiltinRecognizer> {
    pub fn new() -> Self {
        Self {
            recognizer: BuiltinRecognizer,
        }
    }
}

impl<R: DatePhraseRecognizer> TaskPhraseParser<R> {
    pub fn with_recognizer(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// Parse against the system clock's local wall time.
    pub fn parse(&self, title: &str) -> ParseResult {
        self.parse_at(title, Local::now().naive_local())
    }

    /// Parse against an explicit reference instant (local wall time). Total
    /// over all inputs: unrecognizable text degrades to defaults instead of
    /// failing.
    pub fn parse_at(&self, title: &str, now: NaiveDateTime) -> ParseResult {
        let detection = recurrence::detect(title);
        debug!(
            pattern = %detection.pattern,
            interval = detection.interval,
            "recurrence pass"
        );

        let clock = temporal::extract_clock_time(title);
        let end = boundary::resolve_end(title, now, &self.recognizer);
        let start = boundary::resolve_start(title, now, &self.recognizer);

        let inferred_due = self.infer_due(title, now, &detection, clock, end.as_ref());
        let due_at = start
            .as_ref()
            .map(|s| s.starts_at)
            .or(inferred_due)
            .unwrap_or_else(|| temporal::tomorrow_at(now, None));
        debug!(%due_at, "temporal pass");

        let warnings = validate_boundaries(start.as_ref(), end.as_ref());

        let cleaned_title = sanitize::clean_title(title, &detection, &self.recognizer, now);
        let priority = sanitize::detect_priority(title);

        ParseResult {
            original_title: title.to_string(),
            cleaned_title,
            due_at,
            priority,
            recurrence: detection.pattern,
            recurrence_interval: detection.interval.max(1),
            recurrence_ends_at: end.map(|b| b.ends_at),
            warnings,
        }
    }

    /// Due date strategies in precedence order: recurring-daily shortcut,
    /// weekday shortcut, monthly ordinal day, then the recognizer over the
    /// title with any "until ..." suffix cut away.
    fn infer_due(
        &self,
        title: &str,
        now: NaiveDateTime,
        detection: &Detection,
        clock: Option<ClockTime>,
        end: Option<&EndBoundary>,
    ) -> Option<NaiveDateTime> {
        if detection.pattern == RecurrencePattern::Daily {
            return Some(temporal::tomorrow_at(now, clock));
        }

        if matches!(
            detection.pattern,
            RecurrencePattern::None | RecurrencePattern::Weekly
        ) {
            if let Some(weekday) = temporal::extract_weekday(title) {
                return Some(temporal::weekday_due(now, weekday, clock));
            }
        }

        if detection.pattern == RecurrencePattern::Monthly {
            if let Some(day) = temporal::extract_ordinal_day(title) {
                if let Some(date) = temporal::next_day_of_month(now.date(), day) {
                    let time = clock
                        .map(|c| c.as_time())
                        .unwrap_or(chrono::NaiveTime::MIN);
                    return Some(date.and_time(time));
                }
            }
        }

        let mut text = title.to_string();
        if let Some(end) = end {
            text.replace_range(end.span.0..end.span.1, "");
        }
        let recognized = self
            .recognizer
            .recognize(&text, now)
            .ok()
            .and_then(|spans| spans.into_iter().next())
            .map(|span| span.resolved)?;
        Some(temporal::apply_clock_override(recognized, clock))
    }
}

fn validate_boundaries(
    start: Option<&StartBoundary>,
    end: Option<&EndBoundary>,
) -> Vec<ParseWarning> {
    match (start, end) {
        (Some(start), Some(end)) if start.starts_at > end.ends_at => {
            vec![ParseWarning::StartAfterEnd]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use crate::recognizer::{DateSpan, RecognizerError};
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Saturday 2025-03-15, 10:30 local.
    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn parse(title: &str) -> ParseResult {
        TaskPhraseParser::new().parse_at(title, reference())
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn medicine_every_day_at_eight() {
        let result = parse("Take medicine every day at 8am");
        assert_eq!(result.recurrence, RecurrencePattern::Daily);
        assert_eq!(result.recurrence_interval, 1);
        assert_eq!(result.due_at, at(2025, 3, 16, 8, 0));
        assert_eq!(result.cleaned_title, "Take medicine");
        assert_eq!(result.priority, None);
    }

    #[test]
    fn credit_card_bill_monthly_on_the_fifth() {
        let result = parse("Pay credit card bill monthly on the 5th");
        assert_eq!(result.recurrence, RecurrencePattern::Monthly);
        assert_eq!(result.recurrence_interval, 1);
        // The 5th of March has passed on the 15th; next occurrence is April.
        assert_eq!(result.due_at, at(2025, 4, 5, 0, 0));
        assert_eq!(result.cleaned_title, "Pay credit card bill");
    }

    #[test]
    fn backup_weekly_until_end_of_year() {
        let result = parse("Backup files every Friday until Dec 31st");
        assert_eq!(result.recurrence, RecurrencePattern::Weekly);
        assert_eq!(result.recurrence_interval, 1);
        // Next Friday after Saturday the 15th.
        assert_eq!(result.due_at.date(), NaiveDate::from_ymd_opt(2025, 3, 21).unwrap());
        assert_eq!(
            result.recurrence_ends_at,
            Some(
                NaiveDate::from_ymd_opt(2025, 12, 31)
                    .unwrap()
                    .and_hms_milli_opt(23, 59, 59, 999)
                    .unwrap()
            )
        );
        assert_eq!(result.cleaned_title, "Backup files");
    }

    #[test]
    fn weekday_resolution_is_strictly_future() {
        // Parsed on a Saturday: "on Saturdays" must land next week.
        let result = parse("Mow the lawn on Saturdays");
        assert_eq!(result.due_at.date(), NaiveDate::from_ymd_opt(2025, 3, 22).unwrap());
    }

    #[test]
    fn day_of_month_rollover_skips_february() {
        // Parsed on January 31st: February lacks a 31st, March has one.
        let now = at(2025, 1, 31, 9, 0);
        let result = TaskPhraseParser::new().parse_at("Pay bill monthly on the 31st", now);
        assert_eq!(result.due_at.date(), NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
    }

    #[test]
    fn bi_weekly_never_degrades_to_plain_weekly() {
        let result = parse("Review budget bi-weekly");
        assert_eq!(result.recurrence, RecurrencePattern::Weekly);
        assert_eq!(result.recurrence_interval, 2);
    }

    #[test]
    fn every_three_days_keeps_its_interval() {
        let result = parse("Rotate logs every 3 days");
        assert_eq!(result.recurrence, RecurrencePattern::Daily);
        assert_eq!(result.recurrence_interval, 3);
    }

    #[rstest]
    #[case("")]
    #[case("Buy milk")]
    #[case("???")]
    #[case("the the the until")]
    fn totality_over_arbitrary_text(#[case] title: &str) {
        let result = parse(title);
        assert_eq!(result.recurrence, RecurrencePattern::None);
        assert_eq!(result.recurrence_interval, 1);
        // Absolute fallback: tomorrow 09:00.
        assert_eq!(result.due_at, at(2025, 3, 16, 9, 0));
        assert!(!result.cleaned_title.is_empty() || title.is_empty());
    }

    #[test]
    fn clock_time_overrides_recognized_date_time() {
        let result = parse("Submit report tomorrow by 5pm");
        assert_eq!(result.due_at, at(2025, 3, 16, 17, 0));
    }

    #[test]
    fn start_phrase_overrides_inferred_due_date() {
        let result = parse("Water plants on Mondays starting tomorrow");
        assert_eq!(result.due_at.date(), NaiveDate::from_ymd_opt(2025, 3, 16).unwrap());
    }

    #[test]
    fn jogging_until_twentieth_of_next_month() {
        let result = parse("Go jogging daily at 7am until 20th of next month");
        assert_eq!(result.recurrence, RecurrencePattern::Daily);
        assert_eq!(result.due_at, at(2025, 3, 16, 7, 0));
        assert_eq!(
            result.recurrence_ends_at.map(|e| e.date()),
            Some(NaiveDate::from_ymd_opt(2025, 4, 20).unwrap())
        );
    }

    #[test]
    fn priority_rides_along_independently() {
        let result = parse("Call the bank every Monday urgent");
        assert_eq!(result.recurrence, RecurrencePattern::Weekly);
        assert_eq!(result.priority, Some(Priority::High));
    }

    #[test]
    fn start_after_end_surfaces_a_warning() {
        let result = parse("Stretch daily until tomorrow starting June 1st");
        assert_eq!(result.warnings, vec![ParseWarning::StartAfterEnd]);
        assert!(result.recurrence_ends_at.is_some());
    }

    #[test]
    fn interval_is_always_at_least_one() {
        let result = parse("Ping the server every 0 days");
        assert_eq!(result.recurrence, RecurrencePattern::Daily);
        assert_eq!(result.recurrence_interval, 1);
    }

    struct FailingRecognizer;

    impl DatePhraseRecognizer for FailingRecognizer {
        fn recognize(
            &self,
            _text: &str,
            _now: NaiveDateTime,
        ) -> Result<Vec<DateSpan>, RecognizerError> {
            Err(RecognizerError::Unavailable("stubbed out".into()))
        }
    }

    #[test]
    fn recognizer_failure_degrades_to_defaults() {
        let parser = TaskPhraseParser::with_recognizer(FailingRecognizer);
        let result = parser.parse_at("Dentist appointment 2025-06-01", reference());
        assert_eq!(result.due_at, at(2025, 3, 16, 9, 0));
        assert_eq!(result.recurrence, RecurrencePattern::None);
        assert!(!result.cleaned_title.is_empty());
    }

    #[test]
    fn daily_without_clock_defaults_to_nine() {
        let result = parse("Stretch daily");
        assert_eq!(result.due_at, at(2025, 3, 16, 9, 0));
    }

    #[test]
    fn weekday_due_time_defaults_to_midnight() {
        let result = parse("Call Mom on Sundays");
        assert_eq!(result.due_at.date(), NaiveDate::from_ymd_opt(2025, 3, 16).unwrap());
        assert_eq!(result.due_at.time(), NaiveTime::MIN);
        assert_eq!(result.cleaned_title, "Call Mom");
    }
}
