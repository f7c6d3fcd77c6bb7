pub use tasksense_cli::cli;
pub use tasksense_cli::commands;
pub use tasksense_cli::config;
pub use tasksense_cli::RunConfig;

pub use tasksense_core as core;
pub use tasksense_core::model;
pub use tasksense_core::parser;
pub use tasksense_core::schedule;
pub use tasksense_core::TaskPhraseParser;
