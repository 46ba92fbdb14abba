//! KEYSTONE.BUILD Core Types
//!
//! This crate contains the pure data types shared by the strategy registry
//! and the dynamic scheduler: requests, policies, results, errors, and
//! path-addressed output capture. No scheduling logic lives here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod id;
pub mod outerr;
pub mod request;

// Re-exports
pub use error::{ExecError, ExecResult};
pub use id::{BuildId, RequestId};
pub use outerr::OutErr;
pub use request::{ExecutionPolicy, ExecutionRequest, ExecutionResult};
