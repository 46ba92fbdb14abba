//! KEYSTONE.BUILD Strategy Registry
//!
//! Resolves an execution request to a concrete executor using mnemonic and
//! regex-pattern rules with defined precedence. The registry is built once
//! per build invocation from external configuration and is immutable and
//! lookup-total thereafter; all failures happen at build-setup time.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod executor;
pub mod registry;

pub use config::{MnemonicRule, PatternRule, StrategyConfig};
pub use executor::SpawnExecutor;
pub use registry::{ConfigError, RegistryBuilder, StrategyRegistry};
