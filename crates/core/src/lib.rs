pub mod boundary;
pub mod model;
pub mod parser;
pub mod recognizer;
pub mod recurrence;
pub mod rules;
pub mod sanitize;
pub mod schedule;
pub mod temporal;

pub use model::*;
pub use parser::TaskPhraseParser;
pub use recognizer::{BuiltinRecognizer, DatePhraseRecognizer, DateSpan, RecognizerError};
pub use schedule::{advance_past_today, next_due_date};
