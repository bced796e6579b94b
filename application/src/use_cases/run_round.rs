//! Run Round use case
//!
//! The dispatch coordinator and evaluation trigger for one comparison round:
//! fan the query out to every panel concurrently, settle each panel
//! independently, join on the full set, then fire the aggregate evaluation
//! exactly once.

use crate::ports::progress::{NoProgress, RoundProgressNotifier};
use crate::ports::rag_gateway::{GatewayError, RagGateway};
use crate::use_cases::SharedSession;
use arena_domain::{DispatchedPanel, PanelId, Query, RoundEvaluation, RoundResult};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors rejected before any request is issued
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RunRoundError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("No panels configured")]
    NoPanels,

    #[error("A round is already in flight")]
    RoundInFlight,
}

/// Outcome of one round
///
/// Per-panel failures never surface here; they are folded into the panel
/// outputs. An evaluation failure withholds scores but keeps the answers,
/// carried as a user-facing notice in `evaluation_error`.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    /// Every panel's settled output, ordered by panel id
    pub result: RoundResult,
    /// Scores and benchmark answer, if evaluation succeeded
    pub evaluation: Option<RoundEvaluation>,
    /// Why evaluation was withheld, if it failed
    pub evaluation_error: Option<String>,
}

/// Use case for running one full round
pub struct RunRoundUseCase<G: RagGateway + 'static> {
    gateway: Arc<G>,
    session: SharedSession,
}

impl<G: RagGateway + 'static> RunRoundUseCase<G> {
    pub fn new(gateway: Arc<G>, session: SharedSession) -> Self {
        Self { gateway, session }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, query_text: &str) -> Result<RoundOutcome, RunRoundError> {
        self.execute_with_progress(query_text, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        query_text: &str,
        progress: &dyn RoundProgressNotifier,
    ) -> Result<RoundOutcome, RunRoundError> {
        let query = Query::try_new(query_text).ok_or(RunRoundError::EmptyQuery)?;

        // Acquire the round gate and flip every panel to pending in one
        // critical section, so the all-pending state is observed atomically
        // relative to any response.
        let dispatched = {
            let mut session = self.session.lock().await;
            session.begin_round(query.clone()).map_err(|e| match e {
                arena_domain::DomainError::RoundInFlight => RunRoundError::RoundInFlight,
                _ => RunRoundError::NoPanels,
            })?
        };

        info!("Starting round with {} panels", dispatched.len());
        progress.on_round_start(dispatched.len());

        let result = self.dispatch_panels(&query, dispatched, progress).await;
        progress.on_round_settled();

        // Join barrier passed: evaluation fires exactly once, never while
        // any panel is pending.
        let outcome = self.evaluate_round(result, progress).await;

        Ok(outcome)
    }

    /// Fan out one request per panel and join on the full set
    async fn dispatch_panels(
        &self,
        query: &Query,
        dispatched: Vec<DispatchedPanel>,
        progress: &dyn RoundProgressNotifier,
    ) -> RoundResult {
        let mut join_set = JoinSet::new();

        for panel in dispatched {
            let gateway = Arc::clone(&self.gateway);
            let query = query.clone();

            // Each task owns its panel's captured config and converts its
            // own failure into a value, so no error crosses to a sibling.
            join_set.spawn(async move {
                let result = gateway
                    .query_panel(panel.strategy, &panel.model, &query)
                    .await;
                (panel.id, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((id, outcome)) => self.settle_panel(id, outcome, progress).await,
                Err(e) => {
                    // Lost task: the panel it carried is settled below by
                    // the fail_unsettled sweep.
                    warn!("Panel task join error: {}", e);
                }
            }
        }

        let mut session = self.session.lock().await;
        let swept = session.fail_unsettled("Error: panel task aborted");
        if swept > 0 {
            warn!("{} panel(s) settled by the lost-task sweep", swept);
        }

        session
            .settle_round()
            .expect("all panels terminal after join barrier")
    }

    /// Apply one panel's outcome to the session, keyed by dispatched id
    async fn settle_panel(
        &self,
        id: PanelId,
        outcome: Result<crate::ports::rag_gateway::PanelAnswer, GatewayError>,
        progress: &dyn RoundProgressNotifier,
    ) {
        let mut session = self.session.lock().await;
        match outcome {
            Ok(answer) => {
                debug!("Panel {} succeeded", id);
                let applied =
                    session.apply_panel_success(id, answer.answer, answer.latency, answer.context);
                if !applied {
                    warn!("Dropped late result for unknown panel {}", id);
                }
                progress.on_panel_settled(id, true);
            }
            Err(e) => {
                info!("Panel {} failed: {}", id, e);
                let applied = session.apply_panel_failure(id, e.panel_error_text());
                if !applied {
                    warn!("Dropped late failure for unknown panel {}", id);
                }
                progress.on_panel_settled(id, false);
            }
        }
    }

    /// Fire the single aggregate evaluation call and merge the result
    async fn evaluate_round(
        &self,
        result: RoundResult,
        progress: &dyn RoundProgressNotifier,
    ) -> RoundOutcome {
        {
            let mut session = self.session.lock().await;
            session.begin_evaluation();
        }
        progress.on_evaluation_start();

        match self.gateway.evaluate(&result).await {
            Ok(evaluation) => {
                info!(
                    "Evaluation complete, best panel: {:?}",
                    evaluation.best_panel
                );
                let mut session = self.session.lock().await;
                session.complete_evaluation(evaluation.clone());
                progress.on_evaluation_complete(true);
                RoundOutcome {
                    result,
                    evaluation: Some(evaluation),
                    evaluation_error: None,
                }
            }
            Err(e) => {
                // Evaluation failure withholds comparison but never erases
                // panel answers; the gate is released either way.
                warn!("Evaluation failed: {}", e);
                let mut session = self.session.lock().await;
                session.fail_evaluation();
                progress.on_evaluation_complete(false);
                RoundOutcome {
                    result,
                    evaluation: None,
                    evaluation_error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::rag_gateway::PanelAnswer;
    use crate::use_cases::shared_session;
    use arena_domain::{
        LiveState, ModelId, PanelScore, RetrievalStrategy, RoundPhase, Session,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Scripted behavior for one model id
    #[derive(Clone)]
    enum Script {
        Answer { text: &'static str, delay_ms: u64 },
        ServerError { detail: &'static str, delay_ms: u64 },
    }

    /// In-process gateway with per-model scripts and call recording
    struct MockGateway {
        scripts: HashMap<&'static str, Script>,
        eval_fails: bool,
        eval_calls: AtomicUsize,
        eval_round: StdMutex<Option<RoundResult>>,
    }

    impl MockGateway {
        fn new(scripts: &[(&'static str, Script)]) -> Self {
            Self {
                scripts: scripts.iter().cloned().collect(),
                eval_fails: false,
                eval_calls: AtomicUsize::new(0),
                eval_round: StdMutex::new(None),
            }
        }

        fn with_failing_eval(mut self) -> Self {
            self.eval_fails = true;
            self
        }

        fn eval_call_count(&self) -> usize {
            self.eval_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RagGateway for MockGateway {
        async fn query_panel(
            &self,
            _strategy: RetrievalStrategy,
            model: &ModelId,
            _query: &Query,
        ) -> Result<PanelAnswer, GatewayError> {
            let script = self
                .scripts
                .get(model.as_str())
                .cloned()
                .unwrap_or(Script::Answer {
                    text: "default",
                    delay_ms: 0,
                });
            match script {
                Script::Answer { text, delay_ms } => {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    Ok(PanelAnswer::new(text))
                }
                Script::ServerError { detail, delay_ms } => {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    Err(GatewayError::Server {
                        status: 500,
                        detail: detail.to_string(),
                    })
                }
            }
        }

        async fn evaluate(&self, round: &RoundResult) -> Result<RoundEvaluation, GatewayError> {
            self.eval_calls.fetch_add(1, Ordering::SeqCst);
            *self.eval_round.lock().unwrap() = Some(round.clone());

            if self.eval_fails {
                return Err(GatewayError::Server {
                    status: 500,
                    detail: "evaluator unavailable".to_string(),
                });
            }

            let scores = round
                .outputs
                .iter()
                .map(|o| {
                    (
                        o.id,
                        PanelScore {
                            similarity: 0.8,
                            correctness: 0.8,
                            total: 0.8,
                        },
                    )
                })
                .collect::<Vec<_>>();
            let best_panel = scores.first().map(|(id, _)| *id);
            Ok(RoundEvaluation {
                benchmark_answer: "benchmark".to_string(),
                scores,
                best_panel,
            })
        }

        async fn upload_document(
            &self,
            _file_name: &str,
            _bytes: Vec<u8>,
        ) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    /// Progress notifier that records panel settle order
    #[derive(Default)]
    struct RecordingProgress {
        settled: StdMutex<Vec<(PanelId, bool)>>,
        round_settled_after: AtomicUsize,
    }

    impl RoundProgressNotifier for RecordingProgress {
        fn on_round_start(&self, _total_panels: usize) {}
        fn on_panel_settled(&self, id: PanelId, success: bool) {
            self.settled.lock().unwrap().push((id, success));
        }
        fn on_round_settled(&self) {
            self.round_settled_after
                .store(self.settled.lock().unwrap().len(), Ordering::SeqCst);
        }
        fn on_evaluation_start(&self) {}
        fn on_evaluation_complete(&self, _success: bool) {}
    }

    fn stock_session() -> SharedSession {
        // basic/groq and self-query/gemini, the two stock panels
        shared_session(Session::new())
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_outcome_round_settles_at_slowest_panel() {
        // Panel 1 (groq) answers after 300ms; panel 2 (gemini) gets a 500
        // after 100ms. The failure arrives first, never blocks panel 1, and
        // evaluation sees both texts.
        let gateway = Arc::new(MockGateway::new(&[
            (
                "groq",
                Script::Answer {
                    text: "March 1",
                    delay_ms: 300,
                },
            ),
            (
                "gemini",
                Script::ServerError {
                    detail: "timeout",
                    delay_ms: 100,
                },
            ),
        ]));
        let use_case = RunRoundUseCase::new(Arc::clone(&gateway), stock_session());
        let progress = RecordingProgress::default();

        let outcome = use_case
            .execute_with_progress("What is the deadline?", &progress)
            .await
            .unwrap();

        // Settle order follows response latency, not panel order
        let settled = progress.settled.lock().unwrap().clone();
        assert_eq!(settled, vec![(PanelId::new(2), false), (PanelId::new(1), true)]);
        // The join barrier fired only after both panels settled
        assert_eq!(progress.round_settled_after.load(Ordering::SeqCst), 2);

        assert_eq!(outcome.result.outputs[0].answer, "March 1");
        assert_eq!(outcome.result.outputs[1].answer, "Error: timeout");

        // Evaluation fired exactly once, with both panels' texts
        assert_eq!(gateway.eval_call_count(), 1);
        let eval_round = gateway.eval_round.lock().unwrap().clone().unwrap();
        assert_eq!(eval_round.outputs.len(), 2);
        assert_eq!(eval_round.outputs[1].answer, "Error: timeout");
        assert!(outcome.evaluation.is_some());
    }

    #[tokio::test]
    async fn test_every_panel_reaches_terminal_state() {
        let session = shared_session(Session::with_panels(&[
            (RetrievalStrategy::Basic, ModelId::Groq),
            (RetrievalStrategy::SelfQuery, ModelId::Gemini),
            (RetrievalStrategy::Reranker, ModelId::Jina),
        ]));
        let gateway = Arc::new(MockGateway::new(&[
            ("groq", Script::Answer { text: "a", delay_ms: 0 }),
            (
                "gemini",
                Script::ServerError {
                    detail: "boom",
                    delay_ms: 0,
                },
            ),
            ("jina", Script::Answer { text: "c", delay_ms: 0 }),
        ]));
        let use_case = RunRoundUseCase::new(gateway, Arc::clone(&session));

        use_case.execute("q").await.unwrap();

        let session = session.lock().await;
        assert!(session.registry().all_settled());
        assert_eq!(session.phase(), RoundPhase::Scored);
    }

    #[tokio::test]
    async fn test_panel_failure_is_isolated() {
        let gateway = Arc::new(MockGateway::new(&[
            ("groq", Script::Answer { text: "fine", delay_ms: 0 }),
            (
                "gemini",
                Script::ServerError {
                    detail: "broken",
                    delay_ms: 0,
                },
            ),
        ]));
        let session = stock_session();
        let use_case = RunRoundUseCase::new(gateway, Arc::clone(&session));

        let outcome = use_case.execute("q").await.unwrap();

        assert_eq!(outcome.result.outputs[0].answer, "fine");
        let session = session.lock().await;
        assert!(matches!(
            session.registry().panels()[0].state,
            LiveState::Succeeded { .. }
        ));
        assert!(matches!(
            session.registry().panels()[1].state,
            LiveState::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_side_effects() {
        let gateway = Arc::new(MockGateway::new(&[]));
        let session = stock_session();
        let use_case = RunRoundUseCase::new(Arc::clone(&gateway), Arc::clone(&session));

        let err = use_case.execute("   ").await.unwrap_err();
        assert_eq!(err, RunRoundError::EmptyQuery);

        let session = session.lock().await;
        assert_eq!(session.phase(), RoundPhase::Idle);
        assert_eq!(gateway.eval_call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_round_rejected() {
        let gateway = Arc::new(MockGateway::new(&[
            ("groq", Script::Answer { text: "slow", delay_ms: 500 }),
            ("gemini", Script::Answer { text: "slow", delay_ms: 500 }),
        ]));
        let session = stock_session();
        let use_case = Arc::new(RunRoundUseCase::new(gateway, Arc::clone(&session)));

        let first = Arc::clone(&use_case);
        let handle = tokio::spawn(async move { first.execute("first").await });

        // Let the first round acquire the gate
        tokio::task::yield_now().await;
        assert!(session.lock().await.round_in_flight());

        let err = use_case.execute("second").await.unwrap_err();
        assert_eq!(err, RunRoundError::RoundInFlight);

        // The first round still completes normally
        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome.result.outputs.len(), 2);
    }

    #[tokio::test]
    async fn test_evaluation_failure_keeps_answers_and_releases_gate() {
        let gateway = Arc::new(
            MockGateway::new(&[
                ("groq", Script::Answer { text: "a1", delay_ms: 0 }),
                ("gemini", Script::Answer { text: "a2", delay_ms: 0 }),
            ])
            .with_failing_eval(),
        );
        let session = stock_session();
        let use_case = RunRoundUseCase::new(Arc::clone(&gateway), Arc::clone(&session));

        let outcome = use_case.execute("q").await.unwrap();

        assert!(outcome.evaluation.is_none());
        let notice = outcome.evaluation_error.unwrap();
        assert!(notice.contains("evaluator unavailable"));

        {
            let session = session.lock().await;
            assert!(session.evaluation().is_none());
            assert_eq!(session.phase(), RoundPhase::EvalFailed);
            assert!(matches!(
                session.registry().panels()[0].state,
                LiveState::Succeeded { .. }
            ));
        }

        // Gate released: a second round is accepted immediately
        let second = use_case.execute("again").await.unwrap();
        assert_eq!(second.result.outputs.len(), 2);
        assert_eq!(gateway.eval_call_count(), 2);
    }

    #[tokio::test]
    async fn test_single_panel_round() {
        let session = shared_session(Session::with_panels(&[(
            RetrievalStrategy::Basic,
            ModelId::Groq,
        )]));
        let gateway = Arc::new(MockGateway::new(&[(
            "groq",
            Script::Answer { text: "only", delay_ms: 0 },
        )]));
        let use_case = RunRoundUseCase::new(Arc::clone(&gateway), session);

        let outcome = use_case.execute("q").await.unwrap();
        assert_eq!(outcome.result.outputs.len(), 1);
        assert_eq!(gateway.eval_call_count(), 1);
    }
}
