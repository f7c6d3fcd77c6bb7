//! Process-wide pattern tables. Built once behind `Lazy` statics and treated
//! as read-only afterwards, so parsing stays safe under concurrent callers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::RecurrencePattern;

pub const MONTH_NAMES: [&str; 12] = [
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

pub const WEEKDAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Alternation of full month names followed by their three-letter forms.
/// Full names come first so "march" is never consumed as "mar" + trailing
/// word characters.
pub fn month_alternation() -> String {
    let full = MONTH_NAMES.join("|");
    let short: Vec<String> = MONTH_NAMES.iter().map(|m| m[..3].to_string()).collect();
    format!("{}|{}", full, short.join("|"))
}

/// How the recurrence interval is derived from a rule match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalSpec {
    Fixed(u32),
    /// Scan the matched phrases in order for the first embedded positive
    /// integer; default to 1 when none is found.
    FromMatch,
}

pub struct RecurrenceRule {
    pub pattern: Regex,
    pub kind: RecurrencePattern,
    pub interval: IntervalSpec,
}

impl RecurrenceRule {
    fn new(pattern: &str, kind: RecurrencePattern, interval: IntervalSpec) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid recurrence rule regex"),
            kind,
            interval,
        }
    }
}

/// Ordered recurrence rule table; the first rule that matches anywhere in the
/// title wins and no later rule is consulted. Ordering is the tie-break
/// mechanism: "bi-weekly" sits above the bare "weekly" rule, the counted
/// "every N <unit>" rules sit above their bare-unit forms, and the month-name
/// rules come last so they cannot shadow anything more specific.
pub static RECURRENCE_RULES: Lazy<Vec<RecurrenceRule>> = Lazy::new(|| {
    let months = month_alternation();
    let weekdays = WEEKDAY_NAMES.join("|");
    vec![
        RecurrenceRule::new(
            r"(?i)\bbi[-\s]?weekly\b",
            RecurrencePattern::Weekly,
            IntervalSpec::Fixed(2),
        ),
        RecurrenceRule::new(
            r"(?i)\bevery\s+(\d+)\s+days?\b",
            RecurrencePattern::Daily,
            IntervalSpec::FromMatch,
        ),
        RecurrenceRule::new(
            r"(?i)\bevery\s+(\d+)\s+weeks?\b",
            RecurrencePattern::Weekly,
            IntervalSpec::FromMatch,
        ),
        RecurrenceRule::new(
            r"(?i)\bevery\s+(\d+)\s+months?\b",
            RecurrencePattern::Monthly,
            IntervalSpec::FromMatch,
        ),
        RecurrenceRule::new(
            &format!(
                r"(?i)\bevery\s+(first|second|third|fourth|last)\s+({})s?\b",
                weekdays
            ),
            RecurrencePattern::Custom,
            IntervalSpec::Fixed(1),
        ),
        RecurrenceRule::new(
            r"(?i)\bevery\s+weekdays?\b",
            RecurrencePattern::Weekly,
            IntervalSpec::Fixed(1),
        ),
        RecurrenceRule::new(
            r"(?i)\bweekdays?\b",
            RecurrencePattern::Weekly,
            IntervalSpec::Fixed(1),
        ),
        RecurrenceRule::new(
            &format!(r"(?i)\b(?:every|on)\s+(?:{})s?\b", weekdays),
            RecurrencePattern::Weekly,
            IntervalSpec::Fixed(1),
        ),
        RecurrenceRule::new(
            r"(?i)\b(?:daily|every\s+day)\b",
            RecurrencePattern::Daily,
            IntervalSpec::Fixed(1),
        ),
        RecurrenceRule::new(
            r"(?i)\bweekly\b",
            RecurrencePattern::Weekly,
            IntervalSpec::Fixed(1),
        ),
        RecurrenceRule::new(
            r"(?i)\bmonthly\b",
            RecurrencePattern::Monthly,
            IntervalSpec::Fixed(1),
        ),
        RecurrenceRule::new(
            r"(?i)\b(?:yearly|annually|every\s+year)\b",
            RecurrencePattern::Yearly,
            IntervalSpec::Fixed(1),
        ),
        RecurrenceRule::new(
            &format!(r"(?i)\bevery\s+(?:{})s?\b", months),
            RecurrencePattern::Custom,
            IntervalSpec::Fixed(1),
        ),
        RecurrenceRule::new(
            &format!(r"(?i)\b(?:monthly)?\s*(?:in)?\s+(?:{})\b", months),
            RecurrencePattern::Custom,
            IntervalSpec::Fixed(1),
        ),
        RecurrenceRule::new(
            &format!(r"(?i)\b(?:{})\b", months),
            RecurrencePattern::Custom,
            IntervalSpec::Fixed(1),
        ),
    ]
});

/// First embedded integer in a matched phrase.
pub static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Clock-time phrase: "(at|by) H(:MM)? (am|pm)?".
pub static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:at|by)\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b").expect("valid regex")
});

/// Clock-time phrases as stripped from titles; unlike [`CLOCK_TIME`] this
/// requires a meridian and also accepts an "on" lead-in.
pub static CLOCK_TIME_STRIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:(?:at|by|on)\s*)?\d{1,2}(?::\d{2})?\s*(?:am|pm)\b").expect("valid regex")
});

/// Weekday reference: "on Mondays", "every Tuesday".
pub static WEEKDAY_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:on|every)\s+({})s?\b",
        WEEKDAY_NAMES.join("|")
    ))
    .expect("valid regex")
});

/// Ordinal day-of-month reference: "the 5th", "on the 31st".
pub static ORDINAL_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bthe\s+(\d{1,2})(?:st|nd|rd|th)\b").expect("valid regex")
});

/// Recurrence end phrase, common misspellings included. Captures everything
/// after the keyword.
pub static UNTIL_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:until|untill|till|til)\b\s+(.+)").expect("valid regex")
});

/// Recurrence start phrase; greedy tail so the whole qualifier is consumed
/// when the title is stripped.
pub static START_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:starting|beginning|from)\s+(?:mid(?:dle)?|end(?:ing)?|\d{{1,2}}(?:st|nd|rd|th)?|next|this|current|coming)?\s*(?:day|week|month|{})?\b[\w\s]*",
        WEEKDAY_NAMES.join("|")
    ))
    .expect("valid regex")
});

/// Filler phrases removed from every title regardless of what matched.
pub static ALWAYS_STRIP: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)repeat\s*this\s*task",
        r"(?i)remind\s*me",
        r"(?i)\btill\b",
        r"(?i)\btil\b",
        r"(?i)\buntil\b",
        r"(?i)\buntill\b",
        r"(?i)starting\b",
        r"(?i)beginning\b",
        r"(?i)\bfor\s+next\s+\d+\s+(?:day|week|month|year)s?\b",
        r"(?i)\bbi[-\s]?weekly\b",
        r"(?i)\bhigh\s*priority\b",
        r"(?i)\bmedium\s*priority\b",
        r"(?i)\blow\s*priority\b",
        r"(?i)\bwith\s+high\b",
        r"(?i)\bwith\s+medium\b",
        r"(?i)\bwith\s+low\b",
        r"(?i)\bon\s+high\b",
        r"(?i)\bon\s+medium\b",
        r"(?i)\bon\s+low\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid strip regex"))
    .collect()
});

/// Bare month names (full forms only), stripped unless the recurrence kind
/// is `custom`.
pub static MONTH_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", MONTH_NAMES.join("|"))).expect("valid regex")
});

/// Connector and qualifier words dropped as whole words in the final pass.
pub static STOPWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:at|by|on|with|every|next|the|this|till|til|untill|until|for|beginning|start|mid|middle|end|close|daily|weekly|monthly|yearly|bi[-\s]?weekly|of|month|week|priority)\b",
    )
    .expect("valid regex")
});

pub static REPEATED_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// Priority qualifier phrases, checked against the original title in
/// specificity order High, Medium, Low.
pub static PRIORITY_HIGH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:high\s*priority|urgent|with\s+high|on\s+high)\b").expect("valid regex")
});

pub static PRIORITY_MEDIUM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:medium\s*priority|normal\s*priority|with\s+medium|on\s+medium)\b")
        .expect("valid regex")
});

pub static PRIORITY_LOW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:low\s*priority|with\s+low|on\s+low)\b").expect("valid regex")
});

/// Month number (1-12) for a full or three-letter English month name.
pub fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| *m == lower || m[..3] == lower)
        .map(|i| i as u32 + 1)
}

/// Chrono weekday for an English weekday name.
pub fn weekday_from_name(name: &str) -> Option<chrono::Weekday> {
    use chrono::Weekday;
    match name.to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
