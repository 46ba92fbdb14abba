//! Observability side channel for race outcomes.
//!
//! Fire-and-forget notifications, never on the critical path. The
//! scheduler notifies the sink only when debug mode is enabled.

use crate::branch::BranchKind;

/// Informational event emitted by the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// A race resolved to a winner
    RaceFinished {
        /// Mnemonic of the raced request
        mnemonic: String,
        /// The winning branch
        branch: BranchKind,
        /// Whether the winning branch's executor succeeded
        success: bool,
    },
}

/// Receiver for scheduler notifications
pub trait EventSink: Send + Sync {
    /// Handle one event; must not block
    fn notify(&self, event: &SchedulerEvent);
}

/// Default sink that forwards events to `tracing`
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn notify(&self, event: &SchedulerEvent) {
        match event {
            SchedulerEvent::RaceFinished {
                mnemonic,
                branch,
                success,
            } => {
                tracing::info!(
                    "{} action {} {}",
                    mnemonic,
                    if *success { "finished" } else { "failed" },
                    branch.pretty_name()
                );
            }
        }
    }
}
