//! Progress reporting for round execution

use arena_application::ports::progress::RoundProgressNotifier;
use arena_domain::PanelId;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports round progress with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    panel_bar: Mutex<Option<ProgressBar>>,
    eval_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            panel_bar: Mutex::new(None),
            eval_bar: Mutex::new(None),
        }
    }

    fn panel_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }

    fn eval_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundProgressNotifier for ProgressReporter {
    fn on_round_start(&self, total_panels: usize) {
        let pb = self.multi.add(ProgressBar::new(total_panels as u64));
        pb.set_style(Self::panel_style());
        pb.set_prefix("Panels");
        pb.set_message("All pending...");
        *self.panel_bar.lock().unwrap() = Some(pb);
    }

    fn on_panel_settled(&self, id: PanelId, success: bool) {
        if let Some(pb) = self.panel_bar.lock().unwrap().as_ref() {
            let status = if success {
                format!("{} panel {}", "v".green(), id)
            } else {
                format!("{} panel {}", "x".red(), id)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_round_settled(&self) {
        if let Some(pb) = self.panel_bar.lock().unwrap().take() {
            pb.finish_with_message(format!("{}", "all settled".green()));
        }
    }

    fn on_evaluation_start(&self) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::eval_style());
        pb.set_prefix("Evaluation");
        pb.set_message("Scoring answers...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        *self.eval_bar.lock().unwrap() = Some(pb);
    }

    fn on_evaluation_complete(&self, success: bool) {
        if let Some(pb) = self.eval_bar.lock().unwrap().take() {
            if success {
                pb.finish_with_message(format!("{}", "scored".green()));
            } else {
                pb.finish_with_message(format!("{}", "failed".red()));
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl RoundProgressNotifier for SimpleProgress {
    fn on_round_start(&self, total_panels: usize) {
        println!("{} Round started ({} panels)", "->".cyan(), total_panels);
    }

    fn on_panel_settled(&self, id: PanelId, success: bool) {
        if success {
            println!("  {} panel {}", "v".green(), id);
        } else {
            println!("  {} panel {} (failed)", "x".red(), id);
        }
    }

    fn on_round_settled(&self) {
        println!("{} All panels settled", "->".cyan());
    }

    fn on_evaluation_start(&self) {
        println!("{} Evaluating...", "->".cyan());
    }

    fn on_evaluation_complete(&self, success: bool) {
        if success {
            println!("{} Evaluation complete", "->".cyan());
        } else {
            println!("{} Evaluation failed", "->".yellow());
        }
        println!();
    }
}
