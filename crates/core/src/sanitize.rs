//! Title cleanup. Every phrase consumed by the other passes is marked as a
//! span against the original title and excluded in a single rebuild, which
//! keeps the passes from interfering with each other's matches; filler and
//! connector words are stripped from the rebuilt string afterwards.

use chrono::NaiveDateTime;
use regex::Regex;

use crate::model::{Priority, RecurrencePattern};
use crate::recognizer::DatePhraseRecognizer;
use crate::recurrence::Detection;
use crate::rules::{
    ALWAYS_STRIP, CLOCK_TIME_STRIP, MONTH_WORDS, ORDINAL_DAY, PRIORITY_HIGH, PRIORITY_LOW,
    PRIORITY_MEDIUM, REPEATED_WHITESPACE, START_PHRASE, STOPWORDS, UNTIL_PHRASE,
};

/// Byte ranges of the original title scheduled for removal.
#[derive(Debug, Default)]
pub struct SpanSet {
    spans: Vec<(usize, usize)>,
}

impl SpanSet {
    pub fn mark(&mut self, start: usize, end: usize) {
        if start < end {
            self.spans.push((start, end));
        }
    }

    pub fn mark_matches(&mut self, pattern: &Regex, text: &str) {
        for m in pattern.find_iter(text) {
            self.mark(m.start(), m.end());
        }
    }

    /// Rebuild `text` with every marked range excluded. Overlapping marks
    /// are merged first so no byte is dropped twice.
    pub fn strip(&self, text: &str) -> String {
        let mut merged = self.spans.clone();
        merged.sort_unstable();
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0usize;
        for (start, end) in merged {
            if start > cursor {
                out.push_str(&text[cursor..start]);
            }
            cursor = cursor.max(end);
        }
        if cursor < text.len() {
            out.push_str(&text[cursor..]);
        }
        out
    }
}

/// Remove every recognized phrase from the title. Falls back to the
/// original when cleaning would leave nothing.
pub fn clean_title<R: DatePhraseRecognizer>(
    title: &str,
    detection: &Detection,
    recognizer: &R,
    now: NaiveDateTime,
) -> String {
    let mut spans = SpanSet::default();

    for (start, end) in &detection.spans {
        spans.mark(*start, *end);
    }
    // Until/start phrases are dropped whether or not they resolved to a date.
    if let Some(m) = UNTIL_PHRASE.find(title) {
        spans.mark(m.start(), m.end());
    }
    spans.mark_matches(&START_PHRASE, title);
    if let Ok(recognized) = recognizer.recognize(title, now) {
        for span in recognized {
            spans.mark(span.start, span.end);
        }
    }
    spans.mark_matches(&CLOCK_TIME_STRIP, title);
    spans.mark_matches(&ORDINAL_DAY, title);

    let mut cleaned = spans.strip(title);
    for pattern in ALWAYS_STRIP.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    if detection.pattern != RecurrencePattern::Custom {
        cleaned = MONTH_WORDS.replace_all(&cleaned, "").into_owned();
    }
    cleaned = STOPWORDS.replace_all(&cleaned, "").into_owned();
    let cleaned = REPEATED_WHITESPACE.replace_all(&cleaned, " ");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        title.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Priority qualifiers are read off the original title, independent of the
/// cleanup; the most specific tier wins.
pub fn detect_priority(title: &str) -> Option<Priority> {
    if PRIORITY_HIGH.is_match(title) {
        Some(Priority::High)
    } else if PRIORITY_MEDIUM.is_match(title) {
        Some(Priority::Medium)
    } else if PRIORITY_LOW.is_match(title) {
        Some(Priority::Low)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::BuiltinRecognizer;
    use crate::recurrence;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn clean(title: &str) -> String {
        let detection = recurrence::detect(title);
        clean_title(title, &detection, &BuiltinRecognizer, reference())
    }

    #[rstest]
    #[case("Take medicine every day at 8am", "Take medicine")]
    #[case("Water the plants weekly on Mondays", "Water plants")]
    #[case("Pay credit card bill monthly on the 5th", "Pay credit card bill")]
    #[case("Call Mom on Sundays", "Call Mom")]
    #[case("Backup files every Friday until Dec 31st", "Backup files")]
    #[case("Submit report by 5pm with high priority", "Submit report")]
    #[case("Water plants weekly starting tomorrow", "Water plants")]
    fn strips_recognized_phrases(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(clean(title), expected);
    }

    #[test]
    fn cleaning_is_idempotent_on_clean_titles() {
        let once = clean("Read a book 30 minutes daily until August 31st");
        let twice = clean(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_cleanup_falls_back_to_the_original() {
        assert_eq!(clean("weekly"), "weekly");
        assert_eq!(clean("daily at 9am"), "daily at 9am");
    }

    #[test]
    fn month_words_survive_custom_recurrence() {
        // "every december" wins a custom rule; the blanket month-word strip
        // is skipped so the rest of the title survives intact.
        let title = "celebrate december holidays every december";
        let detection = recurrence::detect(title);
        assert_eq!(detection.pattern, RecurrencePattern::Custom);
        let cleaned = clean_title(title, &detection, &BuiltinRecognizer, reference());
        assert!(cleaned.contains("holidays"), "cleaned: {cleaned}");
    }

    #[test]
    fn span_strip_merges_overlapping_ranges() {
        let mut spans = SpanSet::default();
        spans.mark(4, 10);
        spans.mark(6, 14);
        spans.mark(20, 24);
        assert_eq!(spans.strip("0123456789012345678901234"), "01234567894");
    }

    #[rstest]
    #[case("Finish slides urgent", Some(Priority::High))]
    #[case("File taxes with high priority", Some(Priority::High))]
    #[case("Reply to email normal priority", Some(Priority::Medium))]
    #[case("Sort photos low priority", Some(Priority::Low))]
    #[case("Buy milk", None)]
    fn priority_detection(#[case] title: &str, #[case] expected: Option<Priority>) {
        assert_eq!(detect_priority(title), expected);
    }

    #[test]
    fn high_priority_outranks_lower_qualifiers() {
        assert_eq!(
            detect_priority("urgent but also low priority somehow"),
            Some(Priority::High)
        );
    }
}
