use std::env;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::cli::Cli;

static ENV_NOW: &str = "TASKSENSE_NOW";

/// Resolved execution context for one invocation. Every command reads dates
/// relative to the same `now`, so a single run is internally consistent even
/// when it straddles midnight.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    now: NaiveDateTime,
}

impl RunConfig {
    /// Resolve the reference instant from the `--now` flag, the
    /// `TASKSENSE_NOW` environment variable, or the system clock, in that
    /// order.
    pub fn discover(now_override: Option<&str>) -> Result<Self> {
        let now = match now_override {
            Some(raw) => parse_instant(raw)?,
            None => match env::var(ENV_NOW) {
                Ok(raw) => parse_instant(&raw)?,
                Err(_) => Local::now().naive_local(),
            },
        };
        Ok(Self { now })
    }

    pub fn at(now: NaiveDateTime) -> Self {
        Self { now }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }
}

pub fn from_cli(cli: &Cli) -> Result<RunConfig> {
    RunConfig::discover(cli.now.as_deref())
}

/// Accepts RFC3339 stamps (offset dropped, wall time kept), ISO datetimes
/// with or without seconds, with a `T` or a space separator, or a bare date
/// (read as midnight).
pub fn parse_instant(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(stamped) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(stamped.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight);
        }
    }
    Err(anyhow!(
        "Could not read '{}' as a datetime: expected e.g. 2025-03-15 or 2025-03-15T09:00",
        raw
    ))
}
