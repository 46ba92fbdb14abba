//! The executor contract.
//!
//! Local, remote, and worker execution are substitutable behind one
//! interface. Executors own their process and connection resources; the
//! scheduler only invokes them.

use async_trait::async_trait;
use keystone_core::{ExecResult, ExecutionRequest, ExecutionResult, OutErr};
use tokio_util::sync::CancellationToken;

/// A capability that can run an execution request
///
/// Implementations must:
/// - write process output and diagnostics only to the given [`OutErr`];
/// - treat the cancellation token as a best-effort abort signal: stop as
///   soon as practical, release resources, and return
///   [`ExecError::Interrupted`](keystone_core::ExecError::Interrupted). The
///   race coordinator does not depend on instantaneous abort, only on the
///   run eventually returning;
/// - be stateless across calls from the scheduler's point of view, so that
///   invoking the same executor repeatedly with different requests is safe.
#[async_trait]
pub trait SpawnExecutor: Send + Sync {
    /// Run the request, capturing output into `out_err`
    ///
    /// # Errors
    ///
    /// Returns error if the spawn fails, the executor cannot run it, or the
    /// run is interrupted
    async fn run(
        &self,
        request: &ExecutionRequest,
        out_err: &OutErr,
        cancel: CancellationToken,
    ) -> ExecResult<Vec<ExecutionResult>>;
}
