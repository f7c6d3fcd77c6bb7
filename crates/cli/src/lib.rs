pub mod cli;
pub mod commands;
pub mod config;

pub use tasksense_core as core;
pub use tasksense_core::model;
pub use tasksense_core::parser;

pub use config::RunConfig;
