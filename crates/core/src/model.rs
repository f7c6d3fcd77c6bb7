use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::Serialize;

/// How a task repeats. `Custom` covers phrases the simple calendar units
/// cannot express (e.g. "every first Monday", bare month names).
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl RecurrencePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrencePattern::None => "none",
            RecurrencePattern::Daily => "daily",
            RecurrencePattern::Weekly => "weekly",
            RecurrencePattern::Monthly => "monthly",
            RecurrencePattern::Yearly => "yearly",
            RecurrencePattern::Custom => "custom",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, RecurrencePattern::None)
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecurrencePattern {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(RecurrencePattern::None),
            "daily" => Ok(RecurrencePattern::Daily),
            "weekly" => Ok(RecurrencePattern::Weekly),
            "monthly" => Ok(RecurrencePattern::Monthly),
            "yearly" | "annually" => Ok(RecurrencePattern::Yearly),
            "custom" => Ok(RecurrencePattern::Custom),
            other => Err(anyhow!(
                "Unknown recurrence pattern '{}': expected none|daily|weekly|monthly|yearly|custom",
                other
            )),
        }
    }
}

impl ValueEnum for RecurrencePattern {
    fn value_variants<'a>() -> &'a [Self] {
        const VARIANTS: [RecurrencePattern; 6] = [
            RecurrencePattern::None,
            RecurrencePattern::Daily,
            RecurrencePattern::Weekly,
            RecurrencePattern::Monthly,
            RecurrencePattern::Yearly,
            RecurrencePattern::Custom,
        ];
        &VARIANTS
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" | "normal" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(anyhow!(
                "Unknown priority '{}': expected high|medium|low",
                other
            )),
        }
    }
}

/// Non-fatal findings surfaced alongside an otherwise complete result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseWarning {
    /// A "starting ..." phrase resolved to an instant after the "until ..."
    /// phrase; both boundaries are kept as stated.
    StartAfterEnd,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::StartAfterEnd => {
                write!(f, "recurrence start falls after its end boundary")
            }
        }
    }
}

/// Structured outcome of parsing one task phrase. Always fully populated:
/// `due_at` carries a concrete instant even when the text held no temporal
/// content, and `recurrence_interval` is at least 1 regardless of pattern.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    pub original_title: String,
    pub cleaned_title: String,
    pub due_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub recurrence: RecurrencePattern,
    pub recurrence_interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_ends_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}

impl ParseResult {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_recurring()
    }
}
