//! Execution error types.

use std::fmt;

/// Result type for executor runs
pub type ExecResult<T> = Result<T, ExecError>;

/// Error produced by an executor while running a request
///
/// Carried inside a race branch's outcome rather than propagated as a task
/// failure, so the race coordinator treats a finished-with-error branch the
/// same as a finished-with-success branch for winner selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// The spawn ran to completion and failed
    Failed {
        /// Human-readable failure message
        message: String,
        /// Process exit code, if the spawn produced one
        exit_code: Option<i32>,
    },

    /// The executor itself could not run the spawn
    Executor {
        /// Human-readable failure message
        message: String,
    },

    /// The run was interrupted before it could complete
    Interrupted,
}

impl ExecError {
    /// Create a failed-spawn error
    #[must_use]
    pub fn failed(message: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::Failed {
            message: message.into(),
            exit_code,
        }
    }

    /// Create an executor-infrastructure error
    #[must_use]
    pub fn executor(message: impl Into<String>) -> Self {
        Self::Executor {
            message: message.into(),
        }
    }

    /// Check whether this error is an interruption
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed {
                message,
                exit_code: Some(code),
            } => write!(f, "Spawn failed (exit code {}): {}", code, message),
            Self::Failed {
                message,
                exit_code: None,
            } => write!(f, "Spawn failed: {}", message),
            Self::Executor { message } => write!(f, "Executor failure: {}", message),
            Self::Interrupted => write!(f, "Execution interrupted"),
        }
    }
}

impl std::error::Error for ExecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_display_with_exit_code() {
        let err = ExecError::failed("compiler crashed", Some(2));
        let s = err.to_string();
        assert!(s.contains("exit code 2"));
        assert!(s.contains("compiler crashed"));
    }

    #[test]
    fn test_failed_display_without_exit_code() {
        let err = ExecError::failed("no output produced", None);
        assert_eq!(err.to_string(), "Spawn failed: no output produced");
    }

    #[test]
    fn test_executor_display() {
        let err = ExecError::executor("connection refused");
        assert_eq!(err.to_string(), "Executor failure: connection refused");
    }

    #[test]
    fn test_is_interrupted() {
        assert!(ExecError::Interrupted.is_interrupted());
        assert!(!ExecError::failed("x", None).is_interrupted());
    }
}
