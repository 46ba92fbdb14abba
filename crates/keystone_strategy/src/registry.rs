//! Strategy registry: request metadata to executor resolution.
//!
//! Built once per build invocation from named executors plus ordered
//! configuration rules. All failures (bad strategy names, bad patterns)
//! happen here at build time; lookup is total and cannot fail.

use crate::config::StrategyConfig;
use crate::executor::SpawnExecutor;
use indexmap::IndexMap;
use keystone_core::ExecutionRequest;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Error raised while wiring configuration names to executor instances
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A mnemonic rule names an unknown strategy
    #[error(
        "'{strategy}' is an invalid strategy for mnemonic \"{mnemonic}\". Valid values are: {valid}"
    )]
    UnknownMnemonicStrategy {
        /// The offending mnemonic
        mnemonic: String,
        /// The unresolvable strategy name
        strategy: String,
        /// Comma-separated sorted list of registered strategy names
        valid: String,
    },

    /// A regex rule names an unknown strategy
    #[error(
        "'{strategy}' is an invalid strategy for pattern \"{pattern}\". Valid values are: {valid}"
    )]
    UnknownPatternStrategy {
        /// The rule's pattern
        pattern: String,
        /// The unresolvable strategy name
        strategy: String,
        /// Comma-separated sorted list of registered strategy names
        valid: String,
    },

    /// A local/remote/worker role names an unknown strategy
    #[error("'{strategy}' is an invalid strategy for the {role} role. Valid values are: {valid}")]
    UnknownRoleStrategy {
        /// The role being configured
        role: String,
        /// The unresolvable strategy name
        strategy: String,
        /// Comma-separated sorted list of registered strategy names
        valid: String,
    },

    /// The default strategy does not resolve
    #[error("'{strategy}' is an invalid default strategy. Valid values are: {valid}")]
    UnknownDefaultStrategy {
        /// The unresolvable strategy name
        strategy: String,
        /// Comma-separated sorted list of registered strategy names
        valid: String,
    },

    /// A regex rule's pattern does not compile
    #[error("invalid regex pattern \"{pattern}\"")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// The underlying regex error
        #[source]
        source: regex::Error,
    },
}

/// A resolved mnemonic-table entry
struct MnemonicEntry {
    strategy: String,
    executor: Arc<dyn SpawnExecutor>,
}

/// A resolved, compiled regex rule
struct RegexEntry {
    pattern: Regex,
    strategy: String,
    executor: Arc<dyn SpawnExecutor>,
}

/// Builder collecting named executors before configuration is applied
#[derive(Default)]
pub struct RegistryBuilder {
    executors: Vec<(Vec<String>, Arc<dyn SpawnExecutor>)>,
}

impl RegistryBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            executors: Vec::new(),
        }
    }

    /// Register an executor under the names it answers to
    #[must_use]
    pub fn register(mut self, names: &[&str], executor: Arc<dyn SpawnExecutor>) -> Self {
        self.executors
            .push((names.iter().map(|n| (*n).to_string()).collect(), executor));
        self
    }

    /// Wire configuration rules to executor instances
    ///
    /// Never runs build work; it only resolves names.
    ///
    /// # Errors
    ///
    /// Returns error if any rule, role, or the default names an unknown
    /// strategy, or if a regex pattern does not compile
    pub fn build(self, config: &StrategyConfig) -> Result<StrategyRegistry, ConfigError> {
        let mut by_name: IndexMap<String, Arc<dyn SpawnExecutor>> = IndexMap::new();
        for (names, executor) in &self.executors {
            for name in names {
                by_name.insert(name.clone(), Arc::clone(executor));
            }
        }
        let valid = valid_names_of(&by_name);

        let mut default = None;
        let mut mnemonic_table: IndexMap<String, MnemonicEntry> = IndexMap::new();
        for rule in &config.strategy_by_mnemonic {
            let key = rule.mnemonic.to_ascii_lowercase();
            if rule.strategy.is_empty() && !rule.mnemonic.is_empty() {
                // An empty strategy value clears the per-mnemonic entry so
                // lookups fall through to the default.
                mnemonic_table.shift_remove(&key);
                continue;
            }
            let executor = by_name.get(&rule.strategy).cloned().ok_or_else(|| {
                ConfigError::UnknownMnemonicStrategy {
                    mnemonic: rule.mnemonic.clone(),
                    strategy: rule.strategy.clone(),
                    valid: valid.clone(),
                }
            })?;
            if rule.mnemonic.is_empty() {
                default = Some(Arc::clone(&executor));
            }
            mnemonic_table.insert(
                key,
                MnemonicEntry {
                    strategy: rule.strategy.clone(),
                    executor,
                },
            );
        }

        let default = match default {
            Some(executor) => executor,
            None => by_name.get(&config.default_strategy).cloned().ok_or_else(|| {
                ConfigError::UnknownDefaultStrategy {
                    strategy: config.default_strategy.clone(),
                    valid: valid.clone(),
                }
            })?,
        };

        let mut regex_rules = Vec::with_capacity(config.strategy_by_regex.len());
        for rule in &config.strategy_by_regex {
            let pattern =
                Regex::new(&rule.pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: rule.pattern.clone(),
                    source,
                })?;
            let executor = by_name.get(&rule.strategy).cloned().ok_or_else(|| {
                ConfigError::UnknownPatternStrategy {
                    pattern: rule.pattern.clone(),
                    strategy: rule.strategy.clone(),
                    valid: valid.clone(),
                }
            })?;
            regex_rules.push(RegexEntry {
                pattern,
                strategy: rule.strategy.clone(),
                executor,
            });
        }

        let resolve_role = |role: &str, strategy: &str| {
            by_name
                .get(strategy)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownRoleStrategy {
                    role: role.to_string(),
                    strategy: strategy.to_string(),
                    valid: valid.clone(),
                })
        };
        let local = resolve_role("local", &config.local_strategy)?;
        let remote = resolve_role("remote", &config.remote_strategy)?;
        let worker = resolve_role("worker", &config.worker_strategy)?;

        Ok(StrategyRegistry {
            mnemonic_table,
            regex_rules,
            default,
            local,
            remote,
            worker,
            valid,
        })
    }
}

/// Lookup table from request metadata to a concrete executor
///
/// Immutable after construction and safe for concurrent lookups.
pub struct StrategyRegistry {
    mnemonic_table: IndexMap<String, MnemonicEntry>,
    regex_rules: Vec<RegexEntry>,
    default: Arc<dyn SpawnExecutor>,
    local: Arc<dyn SpawnExecutor>,
    remote: Arc<dyn SpawnExecutor>,
    worker: Arc<dyn SpawnExecutor>,
    valid: String,
}

impl StrategyRegistry {
    /// Resolve the executor for a request
    ///
    /// Regex rules are scanned first, in declaration order, when the
    /// request carries a description; otherwise the case-insensitive
    /// mnemonic table applies, falling back to the default entry. Total:
    /// pure lookup, no I/O, cannot fail.
    #[must_use]
    pub fn resolve(&self, request: &ExecutionRequest) -> Arc<dyn SpawnExecutor> {
        if !self.regex_rules.is_empty() {
            if let Some(description) = request.description() {
                for rule in &self.regex_rules {
                    if rule.pattern.is_match(description) {
                        tracing::trace!(
                            pattern = %rule.pattern,
                            strategy = %rule.strategy,
                            "regex rule matched request description"
                        );
                        return Arc::clone(&rule.executor);
                    }
                }
            }
        }
        match self
            .mnemonic_table
            .get(&request.mnemonic().to_ascii_lowercase())
        {
            Some(entry) => Arc::clone(&entry.executor),
            None => Arc::clone(&self.default),
        }
    }

    /// Get the executor for the local role
    #[must_use]
    pub fn local(&self) -> Arc<dyn SpawnExecutor> {
        Arc::clone(&self.local)
    }

    /// Get the executor for the remote role
    #[must_use]
    pub fn remote(&self) -> Arc<dyn SpawnExecutor> {
        Arc::clone(&self.remote)
    }

    /// Get the executor for the worker role
    #[must_use]
    pub fn worker(&self) -> Arc<dyn SpawnExecutor> {
        Arc::clone(&self.worker)
    }

    /// Get the default executor (the empty-mnemonic entry)
    #[must_use]
    pub fn default_executor(&self) -> Arc<dyn SpawnExecutor> {
        Arc::clone(&self.default)
    }

    /// Comma-separated sorted list of registered strategy names
    #[must_use]
    pub fn valid_names(&self) -> &str {
        &self.valid
    }

    /// Log every mnemonic and regex mapping
    pub fn debug_dump(&self) {
        for (mnemonic, entry) in &self.mnemonic_table {
            tracing::info!("strategy map: \"{}\" = {}", mnemonic, entry.strategy);
        }
        for rule in &self.regex_rules {
            tracing::info!("strategy map: /{}/ = {}", rule.pattern, rule.strategy);
        }
    }
}

// Hand-written: executor trait objects have no Debug of their own, so the
// entries are summarized by strategy name.
impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field(
                "mnemonic_table",
                &self
                    .mnemonic_table
                    .iter()
                    .map(|(mnemonic, entry)| (mnemonic.as_str(), entry.strategy.as_str()))
                    .collect::<Vec<_>>(),
            )
            .field(
                "regex_rules",
                &self
                    .regex_rules
                    .iter()
                    .map(|rule| (rule.pattern.as_str(), rule.strategy.as_str()))
                    .collect::<Vec<_>>(),
            )
            .field("valid", &self.valid)
            .finish_non_exhaustive()
    }
}

fn valid_names_of(by_name: &IndexMap<String, Arc<dyn SpawnExecutor>>) -> String {
    let mut names: Vec<&str> = by_name.keys().map(String::as_str).collect();
    names.sort_unstable();
    names.join(", ")
}
