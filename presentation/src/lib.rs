//! Presentation layer for rag-arena
//!
//! CLI argument definitions, console output formatting, progress display,
//! and the interactive bench REPL.

pub mod cli;
pub mod output;
pub mod progress;
pub mod repl;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use repl::bench_repl::BenchRepl;
