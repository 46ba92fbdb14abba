//! Options for the dynamic scheduler.
//!
//! Loaded once at build setup alongside the strategy configuration.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;

const DEFAULT_LOCAL_EXECUTION_DELAY_MS: u64 = 1000;

/// Configuration for one scheduler instance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DynamicOptions {
    /// How many milliseconds local execution is delayed once remote
    /// execution has won at least one race in this build
    #[serde(default = "default_local_execution_delay_ms")]
    pub local_execution_delay_ms: u64,

    /// Emit a notification naming the winning branch after every race
    #[serde(default)]
    pub debug_scheduler: bool,

    /// Mnemonics that must not run in a worker even when the request is
    /// worker-eligible; such requests use the plain local executor
    #[serde(default)]
    pub worker_deny_list: BTreeSet<String>,
}

fn default_local_execution_delay_ms() -> u64 {
    DEFAULT_LOCAL_EXECUTION_DELAY_MS
}

impl DynamicOptions {
    /// Create options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            local_execution_delay_ms: DEFAULT_LOCAL_EXECUTION_DELAY_MS,
            debug_scheduler: false,
            worker_deny_list: BTreeSet::new(),
        }
    }

    /// Set the adaptive local execution delay
    #[must_use]
    pub const fn with_local_execution_delay_ms(mut self, ms: u64) -> Self {
        self.local_execution_delay_ms = ms;
        self
    }

    /// Enable or disable debug notifications
    #[must_use]
    pub const fn with_debug_scheduler(mut self, debug: bool) -> Self {
        self.debug_scheduler = debug;
        self
    }

    /// Add a mnemonic to the worker deny-list
    #[must_use]
    pub fn with_denied_worker_mnemonic(mut self, mnemonic: impl Into<String>) -> Self {
        self.worker_deny_list.insert(mnemonic.into());
        self
    }

    /// The adaptive delay as a [`Duration`]
    #[must_use]
    pub const fn local_execution_delay(&self) -> Duration {
        Duration::from_millis(self.local_execution_delay_ms)
    }

    /// Check whether a mnemonic is denied worker execution
    #[must_use]
    pub fn is_worker_denied(&self, mnemonic: &str) -> bool {
        self.worker_deny_list.contains(mnemonic)
    }
}

impl Default for DynamicOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = DynamicOptions::new();
        assert_eq!(options.local_execution_delay_ms, 1000);
        assert!(!options.debug_scheduler);
        assert!(options.worker_deny_list.is_empty());
    }

    #[test]
    fn test_options_builders() {
        let options = DynamicOptions::new()
            .with_local_execution_delay_ms(250)
            .with_debug_scheduler(true)
            .with_denied_worker_mnemonic("JavaDeployJar");
        assert_eq!(options.local_execution_delay(), Duration::from_millis(250));
        assert!(options.debug_scheduler);
        assert!(options.is_worker_denied("JavaDeployJar"));
        assert!(!options.is_worker_denied("Compile"));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: DynamicOptions = serde_json::from_str(
            r#"{"worker_deny_list": ["JavaDeployJar"]}"#,
        )
        .unwrap();
        assert_eq!(options.local_execution_delay_ms, 1000);
        assert!(options.is_worker_denied("JavaDeployJar"));
    }
}
