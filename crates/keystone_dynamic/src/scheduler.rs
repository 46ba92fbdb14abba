//! The dynamic race scheduler.
//!
//! For each request the scheduler inspects the execution policy. A request
//! that may only run in one place is delegated directly to the matching
//! executor. A request that may run in either place is raced: a
//! local-or-worker branch and a remote branch start concurrently, each
//! writing to branch-private scratch output; the first to finish wins,
//! the other is cancelled, and the scheduler waits for both branches to
//! reach a terminal state before reconciling the winner's output into the
//! canonical destination.

use crate::branch::{BranchKind, RaceOutcome};
use crate::options::DynamicOptions;
use crate::report::{EventSink, LogSink, SchedulerEvent};
use futures::future::join_all;
use keystone_core::{BuildId, ExecError, ExecutionPolicy, ExecutionRequest, ExecutionResult, OutErr};
use keystone_strategy::{SpawnExecutor, StrategyRegistry};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Error returned by [`DynamicScheduler::execute`]
#[derive(Debug, thiserror::Error)]
pub enum DynamicError {
    /// The winning branch's executor failed
    #[error(transparent)]
    Execution(ExecError),

    /// The winner's output could not be moved into place
    #[error("Could not move action logs from {branch} execution: {message}")]
    Reconciliation {
        /// The winning branch whose output could not be moved
        branch: BranchKind,
        /// The underlying I/O failure
        message: String,
    },

    /// The caller cancelled the request before an execution error was
    /// captured
    #[error("Interrupted waiting for dynamic execution tasks to finish")]
    Interrupted,

    /// Invariant violation inside the scheduler
    #[error("Internal scheduler error: {0}")]
    Internal(String),
}

fn into_dynamic(error: ExecError) -> DynamicError {
    if error.is_interrupted() {
        DynamicError::Interrupted
    } else {
        DynamicError::Execution(error)
    }
}

/// Scheduler racing candidate executors for requests eligible for both
/// local and remote execution
///
/// Constructed once per build invocation. The `remote_has_won` flag is the
/// single piece of cross-request shared state: once a remote branch wins a
/// race, every subsequent local branch waits the configured delay before
/// starting, so a fast remote cache can satisfy the work without burning
/// local resources. The flag is never reset mid-build.
pub struct DynamicScheduler {
    registry: Arc<StrategyRegistry>,
    options: DynamicOptions,
    sink: Arc<dyn EventSink>,
    build_id: BuildId,
    remote_has_won: AtomicBool,
}

impl DynamicScheduler {
    /// Create a scheduler over the given registry
    #[must_use]
    pub fn new(registry: Arc<StrategyRegistry>, options: DynamicOptions) -> Self {
        Self {
            registry,
            options,
            sink: Arc::new(LogSink),
            build_id: BuildId::new(),
            remote_has_won: AtomicBool::new(false),
        }
    }

    /// Replace the observability sink
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Get this scheduler's build ID
    #[must_use]
    pub const fn build_id(&self) -> BuildId {
        self.build_id
    }

    /// Check whether a remote branch has won a race in this build
    #[must_use]
    pub fn remote_has_won(&self) -> bool {
        self.remote_has_won.load(Ordering::Relaxed)
    }

    /// Execute one request under the given policy
    ///
    /// The returned future resolves only once the race (if any) has fully
    /// unwound: both branches have reached a terminal state and the
    /// winner's output has been reconciled.
    ///
    /// # Errors
    ///
    /// Returns error if the winning (or sole) executor failed, if the
    /// winner's output could not be moved into place, or if the caller
    /// cancelled the request
    pub async fn execute(
        &self,
        request: &ExecutionRequest,
        policy: ExecutionPolicy,
        out_err: &OutErr,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExecutionResult>, DynamicError> {
        match policy {
            ExecutionPolicy::LocalOnly => {
                let (kind, executor) = self.local_or_worker(request);
                tracing::debug!(
                    build = %self.build_id,
                    mnemonic = request.mnemonic(),
                    branch = %kind,
                    "policy restricts request to local execution"
                );
                executor
                    .run(request, out_err, cancel.clone())
                    .await
                    .map_err(into_dynamic)
            }
            ExecutionPolicy::RemoteOnly => {
                tracing::debug!(
                    build = %self.build_id,
                    mnemonic = request.mnemonic(),
                    "policy restricts request to remote execution"
                );
                self.registry
                    .remote()
                    .run(request, out_err, cancel.clone())
                    .await
                    .map_err(into_dynamic)
            }
            ExecutionPolicy::Either => self.race(request, out_err, cancel).await,
        }
    }

    /// Pick the executor for the local-or-worker branch
    ///
    /// A worker-eligible request whose mnemonic is on the deny-list runs
    /// via the plain local executor regardless of eligibility.
    fn local_or_worker(&self, request: &ExecutionRequest) -> (BranchKind, Arc<dyn SpawnExecutor>) {
        if request.worker_eligible() && !self.options.is_worker_denied(request.mnemonic()) {
            (BranchKind::Worker, self.registry.worker())
        } else {
            (BranchKind::Local, self.registry.local())
        }
    }

    async fn race(
        &self,
        request: &ExecutionRequest,
        out_err: &OutErr,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExecutionResult>, DynamicError> {
        let (tx, mut rx) = mpsc::channel::<RaceOutcome>(2);

        let (local_kind, local_executor) = self.local_or_worker(request);
        let delay = if self.remote_has_won() {
            Some(self.options.local_execution_delay())
        } else {
            None
        };

        let local_token = cancel.child_token();
        let remote_token = cancel.child_token();

        let local_handle = tokio::spawn(run_branch(
            local_kind,
            local_executor,
            request.clone(),
            out_err.suffixed(local_kind.suffix()),
            local_token.clone(),
            delay,
            tx.clone(),
        ));
        let remote_handle = tokio::spawn(run_branch(
            BranchKind::Remote,
            self.registry.remote(),
            request.clone(),
            out_err.suffixed(BranchKind::Remote.suffix()),
            remote_token.clone(),
            None,
            tx,
        ));

        // The first branch to produce an outcome wins, whether that finish
        // is a success or a failure.
        let Some(winner) = rx.recv().await else {
            return Err(DynamicError::Internal(
                "no racing branch reported an outcome".to_string(),
            ));
        };
        local_token.cancel();
        remote_token.cancel();

        // Rendezvous: the losing branch must finish unwinding before the
        // race result is returned, however long that takes.
        for join in join_all([local_handle, remote_handle]).await {
            if let Err(e) = join {
                tracing::warn!(error = %e, "racing branch task did not shut down cleanly");
            }
        }
        while let Some(loser) = rx.recv().await {
            if let Err(e) = loser.out_err.discard() {
                tracing::warn!(
                    branch = %loser.branch,
                    error = %e,
                    "could not discard losing branch scratch output"
                );
            }
        }

        self.reconcile(request, winner, out_err, cancel)
    }

    fn reconcile(
        &self,
        request: &ExecutionRequest,
        winner: RaceOutcome,
        dest: &OutErr,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExecutionResult>, DynamicError> {
        let moved = winner.out_err.move_into(dest);

        if winner.branch == BranchKind::Remote {
            self.remote_has_won.store(true, Ordering::Relaxed);
        }

        if self.options.debug_scheduler {
            self.sink.notify(&SchedulerEvent::RaceFinished {
                mnemonic: request.mnemonic().to_string(),
                branch: winner.branch,
                success: winner.is_success(),
            });
        }

        if let Err(e) = moved {
            if winner.error.is_none() {
                return Err(DynamicError::Reconciliation {
                    branch: winner.branch,
                    message: e.to_string(),
                });
            }
            // The execution error carries more diagnostic value; the move
            // failure is subordinate.
            tracing::warn!(
                branch = %winner.branch,
                error = %e,
                "could not move action logs from winning branch"
            );
        }

        if let Some(error) = winner.error {
            return Err(into_dynamic(error));
        }
        if cancel.is_cancelled() {
            return Err(DynamicError::Interrupted);
        }
        Ok(winner.results)
    }
}

/// Run one racing branch to a terminal outcome
///
/// Executor errors are converted into the outcome rather than propagated,
/// so the branch task itself never fails.
async fn run_branch(
    kind: BranchKind,
    executor: Arc<dyn SpawnExecutor>,
    request: ExecutionRequest,
    scratch: OutErr,
    cancel: CancellationToken,
    delay: Option<Duration>,
    outcomes: mpsc::Sender<RaceOutcome>,
) {
    if let Some(delay) = delay {
        tokio::select! {
            () = cancel.cancelled() => {
                let _ = outcomes.send(RaceOutcome::interrupted(kind, scratch)).await;
                return;
            }
            () = tokio::time::sleep(delay) => {}
        }
    }
    tracing::trace!(branch = %kind, mnemonic = request.mnemonic(), "starting racing branch");
    let outcome = match executor.run(&request, &scratch, cancel).await {
        Ok(results) => RaceOutcome::finished(kind, scratch, results),
        Err(error) => RaceOutcome::failed(kind, scratch, error),
    };
    let _ = outcomes.send(outcome).await;
}
