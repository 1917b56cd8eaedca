//! Presentation layer for toolbench
//!
//! This crate contains CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{BenchArgs, Cli, Command, GenerationArgs, OutputFormat, RunArgs};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress, stderr_log_sink};
