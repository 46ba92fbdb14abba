//! KEYSTONE.BUILD Dynamic Race Scheduler
//!
//! Races a local (or worker) executor against a remote executor for
//! requests eligible for both, takes whichever finishes first, discards the
//! loser's side effects, merges the winner's output into the canonical
//! destination, and adapts future scheduling from observed outcomes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod branch;
pub mod options;
pub mod report;
pub mod scheduler;

pub use branch::{BranchKind, RaceOutcome};
pub use options::DynamicOptions;
pub use report::{EventSink, LogSink, SchedulerEvent};
pub use scheduler::{DynamicError, DynamicScheduler};
