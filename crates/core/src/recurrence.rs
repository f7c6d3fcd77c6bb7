//! Recurrence phrase detection against the ordered rule table.

use crate::model::RecurrencePattern;
use crate::rules::{IntervalSpec, NUMBER, RECURRENCE_RULES};

/// Outcome of the recurrence scan: the winning rule's kind and interval,
/// plus every span that rule matched (the sanitizer strips them all).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub pattern: RecurrencePattern,
    pub interval: u32,
    pub spans: Vec<(usize, usize)>,
}

impl Detection {
    fn none() -> Self {
        Self {
            pattern: RecurrencePattern::None,
            interval: 1,
            spans: Vec::new(),
        }
    }
}

/// Scan the title against the rule table; the first rule that matches wins
/// and later rules are not consulted.
pub fn detect(title: &str) -> Detection {
    for rule in RECURRENCE_RULES.iter() {
        let matches: Vec<regex::Match<'_>> = rule.pattern.find_iter(title).collect();
        if matches.is_empty() {
            continue;
        }
        let interval = match rule.interval {
            IntervalSpec::Fixed(n) => n.max(1),
            IntervalSpec::FromMatch => matches
                .iter()
                .find_map(|m| {
                    NUMBER
                        .find(m.as_str())
                        .and_then(|n| n.as_str().parse::<u32>().ok())
                        .filter(|n| *n > 0)
                })
                .unwrap_or(1),
        };
        return Detection {
            pattern: rule.kind,
            interval,
            spans: matches.iter().map(|m| (m.start(), m.end())).collect(),
        };
    }
    Detection::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("take medicine every day at 8am", RecurrencePattern::Daily, 1)]
    #[case("water the plants weekly on Mondays", RecurrencePattern::Weekly, 1)]
    #[case("pay credit card bill monthly on the 5th", RecurrencePattern::Monthly, 1)]
    #[case("workout every weekday at 6pm", RecurrencePattern::Weekly, 1)]
    #[case("stand up every 3 days", RecurrencePattern::Daily, 3)]
    #[case("sprint planning every 2 weeks", RecurrencePattern::Weekly, 2)]
    #[case("deep clean every 6 months", RecurrencePattern::Monthly, 6)]
    #[case("renew passport yearly", RecurrencePattern::Yearly, 1)]
    #[case("pay rent annually", RecurrencePattern::Yearly, 1)]
    #[case("book club every first Monday", RecurrencePattern::Custom, 1)]
    #[case("celebrate every december", RecurrencePattern::Custom, 1)]
    #[case("just buy milk", RecurrencePattern::None, 1)]
    fn detects_pattern_and_interval(
        #[case] title: &str,
        #[case] pattern: RecurrencePattern,
        #[case] interval: u32,
    ) {
        let detection = detect(title);
        assert_eq!(detection.pattern, pattern, "title: {title}");
        assert_eq!(detection.interval, interval, "title: {title}");
    }

    #[test]
    fn bi_weekly_beats_the_generic_weekly_rule() {
        let detection = detect("review budget bi-weekly");
        assert_eq!(detection.pattern, RecurrencePattern::Weekly);
        assert_eq!(detection.interval, 2);

        let spaced = detect("review budget bi weekly");
        assert_eq!(spaced.interval, 2);
    }

    #[test]
    fn counted_rule_beats_the_bare_unit_rule() {
        let detection = detect("hydrate every 3 days daily");
        assert_eq!(detection.pattern, RecurrencePattern::Daily);
        assert_eq!(detection.interval, 3);
    }

    #[test]
    fn zero_interval_falls_back_to_one() {
        let detection = detect("poke the server every 0 days");
        assert_eq!(detection.pattern, RecurrencePattern::Daily);
        assert_eq!(detection.interval, 1);
    }

    #[test]
    fn first_valid_interval_among_matches_wins() {
        let detection = detect("drill every 0 days then every 4 days");
        assert_eq!(detection.interval, 4);
    }

    #[test]
    fn spans_cover_every_match_of_the_winning_rule() {
        let title = "stretch daily and daily again";
        let detection = detect(title);
        assert_eq!(detection.spans.len(), 2);
        for (start, end) in &detection.spans {
            assert_eq!(&title[*start..*end], "daily");
        }
    }

    #[test]
    fn no_match_yields_stable_defaults() {
        let detection = detect("");
        assert_eq!(detection.pattern, RecurrencePattern::None);
        assert_eq!(detection.interval, 1);
        assert!(detection.spans.is_empty());
    }
}
