//! Execution requests, policies, and results.
//!
//! An [`ExecutionRequest`] is one schedulable unit of build work. It is
//! created by the action-execution layer and is read-only to the scheduler.

use serde::{Deserialize, Serialize};

/// One schedulable unit of build work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Short category label (e.g. a compiler action kind)
    mnemonic: String,
    /// Optional human-readable text used for regex-based routing
    description: Option<String>,
    /// Whether this request may run inside a persistent worker process
    worker_eligible: bool,
}

impl ExecutionRequest {
    /// Create a new request with the given mnemonic
    #[must_use]
    pub fn new(mnemonic: impl Into<String>) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            description: None,
            worker_eligible: false,
        }
    }

    /// Set the human-readable description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set worker eligibility
    #[must_use]
    pub fn with_worker_eligible(mut self, eligible: bool) -> Self {
        self.worker_eligible = eligible;
        self
    }

    /// Get the mnemonic
    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Get the description, if any
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Check whether this request may run in a worker
    #[must_use]
    pub const fn worker_eligible(&self) -> bool {
        self.worker_eligible
    }
}

/// Constraint on where a request may legally run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionPolicy {
    /// The request must run on the local machine
    LocalOnly,
    /// The request must run on a remote executor
    RemoteOnly,
    /// The request may run in either place and is eligible for racing
    Either,
}

impl ExecutionPolicy {
    /// Check whether local execution is permitted
    #[must_use]
    pub const fn can_run_locally(&self) -> bool {
        matches!(self, Self::LocalOnly | Self::Either)
    }

    /// Check whether remote execution is permitted
    #[must_use]
    pub const fn can_run_remotely(&self) -> bool {
        matches!(self, Self::RemoteOnly | Self::Either)
    }
}

/// Result of one executed spawn
///
/// Opaque to the scheduler beyond success or failure; carried back to the
/// caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Process exit code
    pub exit_code: i32,
    /// Name of the executor that produced this result
    pub runner: String,
    /// Wall time of the execution, if measured
    pub wall_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a successful result for the given runner
    #[must_use]
    pub fn success(runner: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            runner: runner.into(),
            wall_time_ms: None,
        }
    }

    /// Create a failed result with the given exit code
    #[must_use]
    pub fn failure(runner: impl Into<String>, exit_code: i32) -> Self {
        Self {
            exit_code,
            runner: runner.into(),
            wall_time_ms: None,
        }
    }

    /// Set the measured wall time
    #[must_use]
    pub const fn with_wall_time_ms(mut self, ms: u64) -> Self {
        self.wall_time_ms = Some(ms);
        self
    }

    /// Check whether the spawn succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_new() {
        let request = ExecutionRequest::new("Compile");
        assert_eq!(request.mnemonic(), "Compile");
        assert!(request.description().is_none());
        assert!(!request.worker_eligible());
    }

    #[test]
    fn test_request_builder() {
        let request = ExecutionRequest::new("Link")
            .with_description("Linking //foo:bar")
            .with_worker_eligible(true);
        assert_eq!(request.description(), Some("Linking //foo:bar"));
        assert!(request.worker_eligible());
    }

    #[test]
    fn test_policy_local_only() {
        assert!(ExecutionPolicy::LocalOnly.can_run_locally());
        assert!(!ExecutionPolicy::LocalOnly.can_run_remotely());
    }

    #[test]
    fn test_policy_remote_only() {
        assert!(!ExecutionPolicy::RemoteOnly.can_run_locally());
        assert!(ExecutionPolicy::RemoteOnly.can_run_remotely());
    }

    #[test]
    fn test_policy_either() {
        assert!(ExecutionPolicy::Either.can_run_locally());
        assert!(ExecutionPolicy::Either.can_run_remotely());
    }

    #[test]
    fn test_result_success() {
        let result = ExecutionResult::success("sandboxed");
        assert!(result.is_success());
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.runner, "sandboxed");
    }

    #[test]
    fn test_result_failure() {
        let result = ExecutionResult::failure("remote", 1).with_wall_time_ms(42);
        assert!(!result.is_success());
        assert_eq!(result.wall_time_ms, Some(42));
    }

    #[test]
    fn test_request_serde_roundtrip() {
        let request = ExecutionRequest::new("Compile").with_description("compiling");
        let json = serde_json::to_string(&request).unwrap();
        let back: ExecutionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request, back);
    }
}
