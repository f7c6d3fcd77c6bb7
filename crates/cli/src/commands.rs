use std::fmt;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::cli::{CliCommand, NextArgs, ParseArgs};
use crate::config::{self, RunConfig};
use crate::core::schedule;
use crate::model::ParseResult;
use crate::parser::TaskPhraseParser;

pub fn execute<W: Write>(config: &RunConfig, command: CliCommand, mut writer: W) -> Result<()> {
    match command {
        CliCommand::Parse(args) => handle_parse(config, &args, &mut writer),
        CliCommand::Next(args) => handle_next(&args, &mut writer),
    }
}

fn handle_parse<W: Write>(config: &RunConfig, args: &ParseArgs, mut writer: W) -> Result<()> {
    let text = args.text.join(" ");
    let result = TaskPhraseParser::new().parse_at(&text, config.now());
    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        ParseSummary(&result).write_to(&mut writer)?;
    }
    Ok(())
}

fn handle_next<W: Write>(args: &NextArgs, mut writer: W) -> Result<()> {
    let due = config::parse_instant(&args.due)?;
    let ends = args.ends.as_deref().map(config::parse_instant).transpose()?;

    let next = schedule::next_due_date(due, args.pattern, args.interval)
        .filter(|candidate| ends.map_or(true, |end| *candidate <= end));

    if args.json {
        writeln!(
            writer,
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "next_due_at": next }))?
        )?;
    } else {
        match next {
            Some(instant) => writeln!(writer, "Next: {}", Stamp(instant))?,
            None => writeln!(writer, "No further occurrences")?,
        }
    }
    Ok(())
}

struct ParseSummary<'a>(&'a ParseResult);

impl ParseSummary<'_> {
    fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let result = self.0;
        writeln!(writer, "Title: {}", result.cleaned_title)?;
        writeln!(writer, "Due: {}", Stamp(result.due_at))?;
        if let Some(priority) = result.priority {
            writeln!(writer, "Priority: {}", priority)?;
        }
        if result.is_recurring() {
            if result.recurrence_interval > 1 {
                writeln!(
                    writer,
                    "Recurs: {} (interval {})",
                    result.recurrence, result.recurrence_interval
                )?;
            } else {
                writeln!(writer, "Recurs: {}", result.recurrence)?;
            }
            if let Some(ends_at) = result.recurrence_ends_at {
                writeln!(writer, "Ends: {}", Stamp(ends_at))?;
            }
        }
        for warning in &result.warnings {
            writeln!(writer, "Warning: {}", warning)?;
        }
        Ok(())
    }
}

struct Stamp(NaiveDateTime);

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}
