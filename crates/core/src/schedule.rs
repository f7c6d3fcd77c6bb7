//! Next-occurrence arithmetic for the scheduling consumer: given a parsed
//! recurrence, compute when the follow-up task falls due. `recurrence_ends_at`
//! is treated as an inclusive upper bound throughout.

use chrono::{Days, Months, NaiveDate, NaiveDateTime};

use crate::model::RecurrencePattern;

/// The occurrence after `current`, or `None` when the pattern does not
/// advance on a fixed calendar unit (`none` and `custom`). Month and year
/// steps clamp to the last day of a short target month (Jan 31 + 1 month =
/// Feb 28/29).
pub fn next_due_date(
    current: NaiveDateTime,
    pattern: RecurrencePattern,
    interval: u32,
) -> Option<NaiveDateTime> {
    let interval = interval.max(1);
    match pattern {
        RecurrencePattern::Daily => current.checked_add_days(Days::new(u64::from(interval))),
        RecurrencePattern::Weekly => {
            current.checked_add_days(Days::new(u64::from(interval) * 7))
        }
        RecurrencePattern::Monthly => current.checked_add_months(Months::new(interval)),
        RecurrencePattern::Yearly => {
            current.checked_add_months(Months::new(interval.saturating_mul(12)))
        }
        RecurrencePattern::None | RecurrencePattern::Custom => None,
    }
}

/// Next occurrence strictly catching up to `today`: when a recurring task is
/// completed late, skip the occurrences that already lapsed instead of
/// scheduling into the past. Returns `None` once the end bound is exceeded.
pub fn advance_past_today(
    due: NaiveDateTime,
    today: NaiveDate,
    pattern: RecurrencePattern,
    interval: u32,
    ends_at: Option<NaiveDateTime>,
) -> Option<NaiveDateTime> {
    let within_bound = |candidate: NaiveDateTime| match ends_at {
        Some(end) => candidate <= end,
        None => true,
    };

    let mut next = next_due_date(due, pattern, interval)?;
    while next.date() < today && within_bound(next) {
        next = next_due_date(next, pattern, interval)?;
    }
    within_bound(next).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[rstest]
    #[case(RecurrencePattern::Daily, 1, at(2025, 3, 16, 9))]
    #[case(RecurrencePattern::Daily, 3, at(2025, 3, 18, 9))]
    #[case(RecurrencePattern::Weekly, 1, at(2025, 3, 22, 9))]
    #[case(RecurrencePattern::Weekly, 2, at(2025, 3, 29, 9))]
    #[case(RecurrencePattern::Monthly, 1, at(2025, 4, 15, 9))]
    #[case(RecurrencePattern::Yearly, 1, at(2026, 3, 15, 9))]
    fn advances_by_calendar_unit(
        #[case] pattern: RecurrencePattern,
        #[case] interval: u32,
        #[case] expected: NaiveDateTime,
    ) {
        let current = at(2025, 3, 15, 9);
        assert_eq!(next_due_date(current, pattern, interval), Some(expected));
    }

    #[rstest]
    #[case(RecurrencePattern::None)]
    #[case(RecurrencePattern::Custom)]
    fn non_advancing_patterns_yield_nothing(#[case] pattern: RecurrencePattern) {
        assert_eq!(next_due_date(at(2025, 3, 15, 9), pattern, 1), None);
    }

    #[test]
    fn monthly_step_clamps_short_months() {
        assert_eq!(
            next_due_date(at(2025, 1, 31, 9), RecurrencePattern::Monthly, 1),
            Some(at(2025, 2, 28, 9))
        );
    }

    #[test]
    fn zero_interval_is_treated_as_one() {
        assert_eq!(
            next_due_date(at(2025, 3, 15, 9), RecurrencePattern::Daily, 0),
            Some(at(2025, 3, 16, 9))
        );
    }

    #[test]
    fn catch_up_skips_lapsed_occurrences() {
        // Due a week ago, completed today: the next occurrence lands ahead
        // of today, not one day after the stale due date.
        let due = at(2025, 3, 1, 9);
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(
            advance_past_today(due, today, RecurrencePattern::Daily, 1, None),
            Some(at(2025, 3, 15, 9))
        );
    }

    #[test]
    fn catch_up_respects_inclusive_end_bound() {
        let due = at(2025, 3, 10, 9);
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let ends = at(2025, 3, 11, 23);
        assert_eq!(
            advance_past_today(due, today, RecurrencePattern::Daily, 1, Some(ends)),
            Some(at(2025, 3, 11, 9))
        );
        // End bound already behind the next occurrence: nothing to schedule.
        let ends = at(2025, 3, 10, 23);
        assert_eq!(
            advance_past_today(due, today, RecurrencePattern::Daily, 1, Some(ends)),
            None
        );
    }
}
