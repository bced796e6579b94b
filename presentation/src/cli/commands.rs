//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for round results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output: every panel's answer plus scores
    Full,
    /// Only the score table and benchmark answer
    Scores,
    /// JSON output
    Json,
}

/// CLI arguments for rag-arena
#[derive(Parser, Debug)]
#[command(name = "rag-arena")]
#[command(author, version, about = "RAG bench - one query, N pipelines, scored side by side")]
#[command(long_about = r#"
rag-arena submits one query concurrently to a set of panels, each pairing a
retrieval strategy with a model, then has the backend score every answer
against a generated benchmark answer.

A round settles only when every panel has succeeded or failed; a single
evaluation call then ranks the panels and names the best one.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./arena.toml        Project-level config
3. ~/.config/rag-arena/config.toml   Global config

Example:
  rag-arena "What is the termination notice period?"
  rag-arena -p basic:groq -p reranker:jina "Compare clause 4 and clause 7"
  rag-arena --upload contract.pdf --chat
"#)]
pub struct Cli {
    /// The query to submit to every panel (not required in chat mode)
    pub query: Option<String>,

    /// Start interactive bench mode
    #[arg(short, long)]
    pub chat: bool,

    /// Seed panels as STRATEGY:MODEL pairs (can be specified multiple times)
    #[arg(short, long, value_name = "STRATEGY:MODEL")]
    pub panel: Vec<String>,

    /// Upload this document for indexing before the first round
    #[arg(short, long, value_name = "PATH")]
    pub upload: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_and_panels() {
        let cli = Cli::parse_from([
            "rag-arena",
            "-p",
            "basic:groq",
            "-p",
            "reranker:jina",
            "What is the deadline?",
        ]);
        assert_eq!(cli.query.as_deref(), Some("What is the deadline?"));
        assert_eq!(cli.panel, vec!["basic:groq", "reranker:jina"]);
        assert!(!cli.chat);
    }

    #[test]
    fn test_parse_chat_mode_without_query() {
        let cli = Cli::parse_from(["rag-arena", "--chat", "-vv"]);
        assert!(cli.chat);
        assert!(cli.query.is_none());
        assert_eq!(cli.verbose, 2);
    }
}
