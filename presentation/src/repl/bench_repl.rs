//! REPL (Read-Eval-Print Loop) for interactive bench sessions
//!
//! A plain line submits a round to every panel; slash commands edit the
//! panel set between rounds. Command errors (last panel, round in flight,
//! unknown id) print a notice and never exit the loop.

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use arena_application::{
    RagGateway, RunRoundUseCase, SharedSession, UploadDocumentUseCase,
};
use arena_domain::{ModelId, PanelId, RetrievalStrategy};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;

/// Interactive bench REPL
pub struct BenchRepl<G: RagGateway + 'static> {
    run_round: RunRoundUseCase<G>,
    upload: UploadDocumentUseCase<G>,
    session: SharedSession,
    show_progress: bool,
    history_file: Option<PathBuf>,
}

impl<G: RagGateway + 'static> BenchRepl<G> {
    pub fn new(gateway: Arc<G>, session: SharedSession) -> Self {
        Self {
            run_round: RunRoundUseCase::new(Arc::clone(&gateway), Arc::clone(&session)),
            upload: UploadDocumentUseCase::new(gateway, Arc::clone(&session)),
            session,
            show_progress: true,
            history_file: None,
        }
    }

    /// Set whether to show progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Override the history file location
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self
            .history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("rag-arena").join("history.txt")));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome().await;

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.process_query(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    async fn print_welcome(&self) {
        println!();
        println!("+---------------------------------------------+");
        println!("|          RAG Arena - Bench Mode             |");
        println!("+---------------------------------------------+");
        println!();
        self.print_panels().await;
        println!();
        println!("Type a query to run a round, or /help for commands.");
        println!();
    }

    async fn print_panels(&self) {
        let session = self.session.lock().await;
        println!("Panels:");
        for panel in session.registry().panels() {
            println!("{}", ConsoleFormatter::panel_summary(panel));
        }
        if let Some(document) = session.document() {
            println!("Document: {}", document.file_name);
        } else {
            println!(
                "{}",
                "No document uploaded yet; answers will be degraded.".dimmed()
            );
        }
    }

    /// Handle slash commands. Returns true if the REPL should exit.
    async fn handle_command(&self, cmd: &str) -> bool {
        let mut parts = cmd.split_whitespace();
        let head = parts.next().unwrap_or("");

        match head {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                return true;
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /panels              - Show the panel set");
                println!("  /add                 - Add a panel with default config");
                println!("  /delete N            - Delete panel N (remaining panels renumber)");
                println!("  /strategy N S        - Set panel N's strategy (basic|self-query|reranker)");
                println!("  /model N M           - Set panel N's model (gemini|groq|jina|...)");
                println!("  /upload PATH         - Upload and index a document");
                println!("  /quit                - Exit");
                println!();
            }
            "/panels" => {
                self.print_panels().await;
            }
            "/add" => {
                let mut session = self.session.lock().await;
                match session.add_panel() {
                    Ok(id) => println!("Added panel {}", id),
                    Err(e) => eprintln!("{} {}", "Cannot add:".red(), e),
                }
            }
            "/delete" => match Self::parse_id(parts.next()) {
                Some(id) => {
                    let mut session = self.session.lock().await;
                    match session.delete_panel(id) {
                        Ok(()) => println!("Deleted panel {}; remaining panels renumbered", id),
                        Err(e) => eprintln!("{} {}", "Cannot delete:".red(), e),
                    }
                }
                None => eprintln!("Usage: /delete N"),
            },
            "/strategy" => match (Self::parse_id(parts.next()), parts.next()) {
                (Some(id), Some(raw)) => match raw.parse::<RetrievalStrategy>() {
                    Ok(strategy) => {
                        let mut session = self.session.lock().await;
                        match session.set_strategy(id, strategy) {
                            Ok(()) => println!("Panel {} strategy set to {}", id, strategy),
                            Err(e) => eprintln!("{} {}", "Cannot update:".red(), e),
                        }
                    }
                    Err(e) => eprintln!("{} {}", "Cannot update:".red(), e),
                },
                _ => eprintln!("Usage: /strategy N basic|self-query|reranker"),
            },
            "/model" => match (Self::parse_id(parts.next()), parts.next()) {
                (Some(id), Some(raw)) => {
                    let model: ModelId = raw.parse().expect("model parse is infallible");
                    let mut session = self.session.lock().await;
                    match session.set_model(id, model.clone()) {
                        Ok(()) => println!("Panel {} model set to {}", id, model),
                        Err(e) => eprintln!("{} {}", "Cannot update:".red(), e),
                    }
                }
                _ => eprintln!("Usage: /model N gemini|groq|jina|<custom>"),
            },
            "/upload" => match parts.next() {
                Some(path) => self.process_upload(path).await,
                None => eprintln!("Usage: /upload PATH"),
            },
            _ => {
                println!("Unknown command: {}", head);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_upload(&self, path: &str) {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("{} {}: {}", "Cannot read".red(), path, e);
                return;
            }
        };
        let file_name = std::path::Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string());

        match self.upload.execute(&file_name, bytes).await {
            Ok(()) => println!("Uploaded and indexed {}", file_name),
            Err(e) => eprintln!("{} {}", "Upload failed:".red(), e),
        }
    }

    async fn process_query(&self, query: &str) {
        println!();

        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.run_round.execute_with_progress(query, &progress).await
        } else {
            self.run_round.execute(query).await
        };

        match result {
            Ok(outcome) => {
                let panels = {
                    let session = self.session.lock().await;
                    session.registry().panels().to_vec()
                };
                println!("{}", ConsoleFormatter::format(&panels, &outcome));
            }
            Err(e) => {
                eprintln!("{} {}", "Round rejected:".red(), e);
            }
        }
        println!();
    }

    fn parse_id(raw: Option<&str>) -> Option<PanelId> {
        raw.and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n >= 1)
            .map(PanelId::new)
    }
}
