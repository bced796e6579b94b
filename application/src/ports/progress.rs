//! Round progress notification port
//!
//! Defines the interface for reporting progress while a round runs.

use arena_domain::PanelId;

/// Callback for progress updates during a round
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, progress bars, etc.)
pub trait RoundProgressNotifier: Send + Sync {
    /// Called once every panel has transitioned to pending
    fn on_round_start(&self, total_panels: usize);

    /// Called each time a panel reaches a terminal state
    fn on_panel_settled(&self, id: PanelId, success: bool);

    /// Called once every panel has settled (the join barrier)
    fn on_round_settled(&self);

    /// Called when the aggregate evaluation request is issued
    fn on_evaluation_start(&self);

    /// Called when the evaluation completes or fails
    fn on_evaluation_complete(&self, success: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl RoundProgressNotifier for NoProgress {
    fn on_round_start(&self, _total_panels: usize) {}
    fn on_panel_settled(&self, _id: PanelId, _success: bool) {}
    fn on_round_settled(&self) {}
    fn on_evaluation_start(&self) {}
    fn on_evaluation_complete(&self, _success: bool) {}
}
