//! Console output formatter for round results

use arena_application::RoundOutcome;
use arena_domain::{LiveState, Panel, PanelId};
use colored::Colorize;

/// Formats round outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete round: every panel's answer plus the score table
    pub fn format(panels: &[Panel], outcome: &RoundOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("RAG Arena Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Query:".cyan().bold(),
            outcome.result.query
        ));

        output.push_str(&Self::section_header("Panel Answers"));
        for panel in panels {
            output.push_str(&Self::format_panel(panel));
        }

        output.push_str(&Self::section_header("Evaluation"));
        output.push_str(&Self::format_evaluation(panels, outcome));

        output.push_str(&Self::footer());
        output
    }

    /// Format only the score table and benchmark answer
    pub fn format_scores_only(panels: &[Panel], outcome: &RoundOutcome) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{}\n\n{} {}\n\n",
            "=== RAG Arena Scores ===".cyan().bold(),
            "Q:".bold(),
            outcome.result.query
        ));
        output.push_str(&Self::format_evaluation(panels, outcome));
        output
    }

    /// Format as JSON
    pub fn format_json(panels: &[Panel], outcome: &RoundOutcome) -> String {
        let value = serde_json::json!({
            "query": outcome.result.query,
            "panels": panels,
            "outputs": outcome.result.outputs,
            "evaluation": outcome.evaluation,
            "evaluation_error": outcome.evaluation_error,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_panel(panel: &Panel) -> String {
        let title = format!("── Panel {} [{} / {}] ──", panel.id, panel.strategy, panel.model);
        match &panel.state {
            LiveState::Succeeded {
                answer,
                latency,
                context,
            } => {
                let mut block = format!("\n{}\n{}\n", title.yellow().bold(), answer);
                if let Some(latency) = latency {
                    block.push_str(&format!(
                        "{}\n",
                        format!("({:.2}s)", latency.as_secs_f64()).dimmed()
                    ));
                }
                if let Some(context) = context {
                    block.push_str(&format!(
                        "{}\n{}\n",
                        "Context:".dimmed(),
                        Self::indent(context, "  ")
                    ));
                }
                block
            }
            LiveState::Failed { error } => {
                format!("\n{}\n{}\n", title.red().bold(), error)
            }
            // A settled outcome never contains idle or pending panels
            other => format!("\n{}\n({})\n", title.dimmed(), format!("{:?}", other).dimmed()),
        }
    }

    fn format_evaluation(panels: &[Panel], outcome: &RoundOutcome) -> String {
        let mut output = String::new();

        match (&outcome.evaluation, &outcome.evaluation_error) {
            (Some(evaluation), _) => {
                output.push_str(&format!(
                    "\n{} {}\n\n",
                    "Benchmark answer:".cyan().bold(),
                    evaluation.benchmark_answer
                ));

                output.push_str(&format!(
                    "{:<8} {:<22} {:>11} {:>12} {:>7}\n",
                    "Panel".bold(),
                    "Config".bold(),
                    "Similarity".bold(),
                    "Correctness".bold(),
                    "Total".bold()
                ));
                for panel in panels {
                    let config = format!("{} / {}", panel.strategy, panel.model);
                    let row = match evaluation.score(panel.id) {
                        Some(score) => format!(
                            "{:<8} {:<22} {:>11.4} {:>12.4} {:>7.4}",
                            panel.id, config, score.similarity, score.correctness, score.total
                        ),
                        None => format!("{:<8} {:<22} {:>11} {:>12} {:>7}", panel.id, config, "-", "-", "-"),
                    };
                    if evaluation.is_best(panel.id) {
                        output.push_str(&format!("{} {}\n", row.green().bold(), "* best".green()));
                    } else {
                        output.push_str(&format!("{}\n", row));
                    }
                }

                if evaluation.best_panel.is_none() {
                    output.push_str(&format!("\n{}\n", "No best panel named.".dimmed()));
                }
            }
            (None, Some(notice)) => {
                output.push_str(&format!(
                    "\n{} {}\n{}\n",
                    "Evaluation unavailable:".yellow().bold(),
                    notice,
                    "Panel answers above are unaffected.".dimmed()
                ));
            }
            (None, None) => {
                output.push_str(&format!("\n{}\n", "No evaluation for this round.".dimmed()));
            }
        }

        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One-line status summary for a panel (used by the REPL's /panels)
    pub fn panel_summary(panel: &Panel) -> String {
        let status = match &panel.state {
            LiveState::Idle => "idle".dimmed().to_string(),
            LiveState::Pending => "pending".yellow().to_string(),
            LiveState::Succeeded { .. } => "succeeded".green().to_string(),
            LiveState::Failed { .. } => "failed".red().to_string(),
        };
        format!(
            "  {} {} / {} [{}]",
            format!("#{}", panel.id).bold(),
            panel.strategy,
            panel.model,
            status
        )
    }

    /// Render which panel won, for quick REPL feedback
    pub fn best_panel_line(best: Option<PanelId>) -> String {
        match best {
            Some(id) => format!("{} panel {}", "Best:".green().bold(), id),
            None => "No best panel named.".dimmed().to_string(),
        }
    }
}
