use clap::{value_parser, Args, Parser, Subcommand};

use crate::model::RecurrencePattern;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tasksense",
    version,
    about = "Turn task phrases into due dates, recurrence rules, and clean titles.",
    after_help = "Examples:\n  tasksense parse \"Take medicine every day at 8am\"\n  tasksense parse --json \"Pay rent monthly on the 1st until December\"\n  tasksense next --due 2025-03-15T09:00 --pattern weekly --interval 2"
)]
pub struct Cli {
    /// Override the reference instant (ISO date or datetime, defaults to now)
    #[arg(long, value_name = "DATETIME", global = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Parse a task phrase into its structured fields
    Parse(ParseArgs),
    /// Compute the next occurrence of a recurring task
    Next(NextArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Task phrase (quoting optional; words are joined with spaces)
    #[arg(value_name = "TEXT", required = true)]
    pub text: Vec<String>,

    /// Emit the full result as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct NextArgs {
    /// Current due date (ISO date or datetime)
    #[arg(long = "due", value_name = "DATETIME")]
    pub due: String,

    /// Recurrence pattern
    #[arg(long = "pattern", value_enum)]
    pub pattern: RecurrencePattern,

    /// Repeat every N pattern units
    #[arg(long = "interval", value_name = "N", default_value_t = 1, value_parser = value_parser!(u32))]
    pub interval: u32,

    /// Stop recurring after this instant (inclusive)
    #[arg(long = "ends", value_name = "DATETIME")]
    pub ends: Option<String>,

    /// Emit the result as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}
