//! CLI entrypoint for rag-arena
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use arena_application::{RunRoundUseCase, UploadDocumentUseCase, shared_session};
use arena_domain::{ModelId, RetrievalStrategy, Session};
use arena_infrastructure::{ConfigLoader, FileConfig, HttpRagGateway};
use arena_presentation::{BenchRepl, Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    config.validate().context("Invalid configuration")?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting rag-arena against {}", config.backend.base_url);

    // Seed panels: -p flags override the config file; neither means the
    // two stock panels.
    let seed = if cli.panel.is_empty() {
        config.seed_panels().context("Invalid panel in config")?
    } else {
        parse_panel_flags(&cli.panel)?
    };
    let session = if seed.is_empty() {
        shared_session(Session::new())
    } else {
        shared_session(Session::with_panels(&seed))
    };

    // === Dependency Injection ===
    let timeout = config.backend.timeout_seconds.map(Duration::from_secs);
    let gateway = Arc::new(
        HttpRagGateway::new(&config.backend.base_url, timeout)
            .context("Failed to create backend client")?,
    );

    if let Some(path) = &cli.upload {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let upload = UploadDocumentUseCase::new(Arc::clone(&gateway), Arc::clone(&session));
        upload
            .execute(&file_name, bytes)
            .await
            .context("Upload failed")?;
        if !cli.quiet {
            println!("Uploaded and indexed {}", file_name);
        }
    }

    // Bench (chat) mode
    if cli.chat {
        let repl = BenchRepl::new(gateway, session)
            .with_progress(!cli.quiet && config.repl.show_progress)
            .with_history_file(config.repl.history_file.as_ref().map(PathBuf::from));
        repl.run().await?;
        return Ok(());
    }

    // Single round mode - query is required
    let query = match cli.query {
        Some(q) => q,
        None => bail!("Query is required. Use --chat for interactive mode."),
    };

    if !cli.quiet {
        print_header(&query, &session, &config).await;
    }

    let use_case = RunRoundUseCase::new(gateway, Arc::clone(&session));

    let outcome = if cli.quiet {
        use_case.execute(&query).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(&query, &progress).await?
    };

    let panels = {
        let session = session.lock().await;
        session.registry().panels().to_vec()
    };

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&panels, &outcome),
        OutputFormat::Scores => ConsoleFormatter::format_scores_only(&panels, &outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&panels, &outcome),
    };

    println!("{}", output);

    Ok(())
}

/// Parse `-p STRATEGY:MODEL` flags into domain pairs
fn parse_panel_flags(flags: &[String]) -> Result<Vec<(RetrievalStrategy, ModelId)>> {
    flags
        .iter()
        .map(|raw| {
            let (strategy, model) = raw
                .split_once(':')
                .with_context(|| format!("Invalid panel spec '{}': expected STRATEGY:MODEL", raw))?;
            let strategy: RetrievalStrategy = strategy
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid panel spec '{}': {}", raw, e))?;
            if model.trim().is_empty() {
                bail!("Invalid panel spec '{}': model cannot be empty", raw);
            }
            let model: ModelId = model.parse().expect("model parse is infallible");
            Ok((strategy, model))
        })
        .collect()
}

async fn print_header(
    query: &str,
    session: &arena_application::SharedSession,
    config: &FileConfig,
) {
    println!();
    println!("+============================================================+");
    println!("|                 RAG Arena - Panel Bench                    |");
    println!("+============================================================+");
    println!();
    println!("Query:   {}", query);
    let session = session.lock().await;
    let panels = session
        .registry()
        .panels()
        .iter()
        .map(|p| format!("{}/{}", p.strategy, p.model))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Panels:  {}", panels);
    println!("Backend: {}", config.backend.base_url);
    println!();
}
