//! External strategy configuration.
//!
//! Loaded once at build setup, before any request is scheduled. Supplies
//! the mnemonic table, the ordered regex rules, the default strategy name,
//! and the three strategy names the dynamic scheduler retrieves for its
//! local, remote, and worker roles.

use serde::Deserialize;

/// A mapping from a mnemonic to a strategy name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MnemonicRule {
    /// Mnemonic to match (case-insensitive); `""` is the default entry
    pub mnemonic: String,
    /// Strategy name to resolve; `""` for a non-empty mnemonic removes the
    /// per-mnemonic entry so lookups fall through to the default
    pub strategy: String,
}

/// A mapping from a description pattern to a strategy name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatternRule {
    /// Regex matched against the request description
    pub pattern: String,
    /// Strategy name to resolve
    pub strategy: String,
}

/// Strategy configuration for one build invocation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StrategyConfig {
    /// Ordered mnemonic rules; for duplicate mnemonics the last rule wins
    #[serde(default)]
    pub strategy_by_mnemonic: Vec<MnemonicRule>,

    /// Ordered regex rules; evaluated in declaration order, first match wins
    #[serde(default)]
    pub strategy_by_regex: Vec<PatternRule>,

    /// Strategy name for the empty-mnemonic default entry
    #[serde(default)]
    pub default_strategy: String,

    /// Strategy to use when the scheduler decides to run locally
    #[serde(default = "default_local_strategy")]
    pub local_strategy: String,

    /// Strategy to use when the scheduler decides to run remotely
    #[serde(default = "default_remote_strategy")]
    pub remote_strategy: String,

    /// Strategy to use when the scheduler decides to run in a worker
    #[serde(default = "default_worker_strategy")]
    pub worker_strategy: String,
}

fn default_local_strategy() -> String {
    "sandboxed".to_string()
}

fn default_remote_strategy() -> String {
    "remote".to_string()
}

fn default_worker_strategy() -> String {
    "worker".to_string()
}

impl StrategyConfig {
    /// Create a config with the given default strategy and no rules
    #[must_use]
    pub fn new(default_strategy: impl Into<String>) -> Self {
        Self {
            strategy_by_mnemonic: Vec::new(),
            strategy_by_regex: Vec::new(),
            default_strategy: default_strategy.into(),
            local_strategy: default_local_strategy(),
            remote_strategy: default_remote_strategy(),
            worker_strategy: default_worker_strategy(),
        }
    }

    /// Add a mnemonic rule
    #[must_use]
    pub fn with_mnemonic_rule(
        mut self,
        mnemonic: impl Into<String>,
        strategy: impl Into<String>,
    ) -> Self {
        self.strategy_by_mnemonic.push(MnemonicRule {
            mnemonic: mnemonic.into(),
            strategy: strategy.into(),
        });
        self
    }

    /// Add a regex rule
    #[must_use]
    pub fn with_regex_rule(
        mut self,
        pattern: impl Into<String>,
        strategy: impl Into<String>,
    ) -> Self {
        self.strategy_by_regex.push(PatternRule {
            pattern: pattern.into(),
            strategy: strategy.into(),
        });
        self
    }

    /// Set the local role strategy name
    #[must_use]
    pub fn with_local_strategy(mut self, name: impl Into<String>) -> Self {
        self.local_strategy = name.into();
        self
    }

    /// Set the remote role strategy name
    #[must_use]
    pub fn with_remote_strategy(mut self, name: impl Into<String>) -> Self {
        self.remote_strategy = name.into();
        self
    }

    /// Set the worker role strategy name
    #[must_use]
    pub fn with_worker_strategy(mut self, name: impl Into<String>) -> Self {
        self.worker_strategy = name.into();
        self
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_role_defaults() {
        let config = StrategyConfig::new("local");
        assert_eq!(config.local_strategy, "sandboxed");
        assert_eq!(config.remote_strategy, "remote");
        assert_eq!(config.worker_strategy, "worker");
        assert_eq!(config.default_strategy, "local");
    }

    #[test]
    fn test_config_builders() {
        let config = StrategyConfig::new("local")
            .with_mnemonic_rule("Compile", "remote")
            .with_regex_rule(".*genrule.*", "local")
            .with_worker_strategy("persistent");
        assert_eq!(config.strategy_by_mnemonic.len(), 1);
        assert_eq!(config.strategy_by_regex.len(), 1);
        assert_eq!(config.worker_strategy, "persistent");
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: StrategyConfig = serde_json::from_str(
            r#"{
                "default_strategy": "sandboxed",
                "strategy_by_mnemonic": [
                    {"mnemonic": "Compile", "strategy": "remote"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.default_strategy, "sandboxed");
        assert_eq!(config.strategy_by_mnemonic[0].mnemonic, "Compile");
        assert!(config.strategy_by_regex.is_empty());
        assert_eq!(config.remote_strategy, "remote");
    }
}
