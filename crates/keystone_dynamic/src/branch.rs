//! Racing branches and their terminal outcomes.

use keystone_core::{ExecError, ExecutionResult, OutErr};

/// The kind of executor a racing branch runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    /// Sandboxed execution on the local machine
    Local,
    /// Execution on a remote executor
    Remote,
    /// Execution inside a persistent worker process
    Worker,
}

impl BranchKind {
    /// Suffix appended to scratch output file names for this branch
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Local => ".local",
            Self::Remote => ".remote",
            Self::Worker => ".worker",
        }
    }

    /// Human-readable adverbial form for notifications
    #[must_use]
    pub const fn pretty_name(&self) -> &'static str {
        match self {
            Self::Local => "locally",
            Self::Remote => "remotely",
            Self::Worker => "in a worker",
        }
    }
}

impl std::fmt::Display for BranchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
            Self::Worker => write!(f, "worker"),
        }
    }
}

/// Terminal record produced by one racing branch
///
/// A branch always completes by producing an outcome; an executor error is
/// carried inside rather than propagated as a task failure, so the race is
/// won by whichever branch finishes first, success or not.
#[derive(Debug)]
pub struct RaceOutcome {
    /// Which branch produced this outcome
    pub branch: BranchKind,
    /// The branch-private scratch capture
    pub out_err: OutErr,
    /// The error the executor returned, if any
    pub error: Option<ExecError>,
    /// Results from a successful run (empty on failure)
    pub results: Vec<ExecutionResult>,
}

impl RaceOutcome {
    /// Outcome for a branch whose executor returned results
    #[must_use]
    pub fn finished(branch: BranchKind, out_err: OutErr, results: Vec<ExecutionResult>) -> Self {
        Self {
            branch,
            out_err,
            error: None,
            results,
        }
    }

    /// Outcome for a branch whose executor returned an error
    #[must_use]
    pub fn failed(branch: BranchKind, out_err: OutErr, error: ExecError) -> Self {
        Self {
            branch,
            out_err,
            error: Some(error),
            results: Vec::new(),
        }
    }

    /// Outcome for a branch cancelled before or during its run
    #[must_use]
    pub fn interrupted(branch: BranchKind, out_err: OutErr) -> Self {
        Self::failed(branch, out_err, ExecError::Interrupted)
    }

    /// Check whether the branch's executor succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_suffixes() {
        assert_eq!(BranchKind::Local.suffix(), ".local");
        assert_eq!(BranchKind::Remote.suffix(), ".remote");
        assert_eq!(BranchKind::Worker.suffix(), ".worker");
    }

    #[test]
    fn test_branch_pretty_names() {
        assert_eq!(BranchKind::Local.pretty_name(), "locally");
        assert_eq!(BranchKind::Remote.pretty_name(), "remotely");
        assert_eq!(BranchKind::Worker.pretty_name(), "in a worker");
    }

    #[test]
    fn test_outcome_finished() {
        let out_err = OutErr::new("/tmp/a.out", "/tmp/a.err");
        let outcome = RaceOutcome::finished(
            BranchKind::Remote,
            out_err,
            vec![ExecutionResult::success("remote")],
        );
        assert!(outcome.is_success());
        assert_eq!(outcome.results.len(), 1);
    }

    #[test]
    fn test_outcome_interrupted() {
        let out_err = OutErr::new("/tmp/a.out", "/tmp/a.err");
        let outcome = RaceOutcome::interrupted(BranchKind::Local, out_err);
        assert!(!outcome.is_success());
        assert_eq!(outcome.error, Some(ExecError::Interrupted));
        assert!(outcome.results.is_empty());
    }
}
