//! Run configuration and its validation.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::concurrency::sync::{CoarseLock, FineGrainedLock, ReaderWriterLock, SyncPolicy};

/// Which concurrency policy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// [`CoarseLock`].
    Coarse,
    /// [`FineGrainedLock`].
    #[default]
    FineGrained,
    /// [`ReaderWriterLock`].
    RwLock,
}

impl PolicyKind {
    /// Every policy, in the order they are usually compared.
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Coarse, PolicyKind::FineGrained, PolicyKind::RwLock];

    /// The policy's report name.
    pub fn name(self) -> &'static str {
        match self {
            PolicyKind::Coarse => CoarseLock::NAME,
            PolicyKind::FineGrained => FineGrainedLock::NAME,
            PolicyKind::RwLock => ReaderWriterLock::NAME,
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters of one benchmark run.
///
/// Deserializes from JSON with every field optional; missing fields take the
/// [`Default`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkloadConfig {
    /// Concurrency policy guarding the set.
    pub policy: PolicyKind,
    /// Number of worker threads.
    pub thread_count: usize,
    /// Keys the main thread tries to insert before timing starts.
    pub initial_insert_count: usize,
    /// Operations for the whole run, split evenly across workers.
    pub total_ops: usize,
    /// Fraction of operations that are lookups.
    pub search_percent: f64,
    /// Fraction of operations that are inserts.
    pub insert_percent: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            thread_count: 4,
            initial_insert_count: 1_000,
            total_ops: 100_000,
            search_percent: 0.8,
            insert_percent: 0.1,
        }
    }
}

impl WorkloadConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns `ConfigError::Read` or `ConfigError::Parse`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` on malformed input or unknown fields.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Parse)
    }

    /// Fraction of operations that are deletes.
    pub fn delete_percent(&self) -> f64 {
        1.0 - (self.search_percent + self.insert_percent)
    }

    /// Operations each worker performs; the remainder of the division is
    /// dropped.
    pub fn ops_per_thread(&self) -> usize {
        self.total_ops.checked_div(self.thread_count).unwrap_or(0)
    }

    /// Operations actually dispatched over the whole run.
    pub fn dispatched_ops(&self) -> usize {
        self.thread_count * self.ops_per_thread()
    }

    /// Checks the configuration before any thread is spawned.
    ///
    /// # Errors
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_count == 0 {
            return Err(ConfigError::NoThreads);
        }
        check_fraction("search_percent", self.search_percent)?;
        check_fraction("insert_percent", self.insert_percent)?;
        let sum = self.search_percent + self.insert_percent;
        if sum > 1.0 {
            return Err(ConfigError::MixExceedsOne {
                search: self.search_percent,
                insert: self.insert_percent,
            });
        }
        Ok(())
    }

    /// Picks the operation for a uniform draw `r` in `[0, 1)`.
    pub fn choose(&self, r: f64) -> Operation {
        if r < self.search_percent {
            Operation::Member
        } else if r < self.search_percent + self.insert_percent {
            Operation::Insert
        } else {
            Operation::Delete
        }
    }
}

fn check_fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange { field, value })
    }
}

/// One kind of set operation in the mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Lookup.
    Member,
    /// Insert.
    Insert,
    /// Delete.
    Delete,
}

/// A configuration that cannot be run.
#[derive(Debug)]
pub enum ConfigError {
    /// `thread_count` was zero.
    NoThreads,
    /// A percentage was outside `[0, 1]` (or NaN).
    FractionOutOfRange {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Search and insert fractions leave a negative delete fraction.
    MixExceedsOne {
        /// `search_percent`.
        search: f64,
        /// `insert_percent`.
        insert: f64,
    },
    /// The configuration file could not be read.
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration text was not valid.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoThreads => f.write_str("thread_count must be at least 1"),
            ConfigError::FractionOutOfRange { field, value } => {
                write!(f, "{field} must be between 0 and 1, got {value}")
            }
            ConfigError::MixExceedsOne { search, insert } => write!(
                f,
                "search_percent + insert_percent must not exceed 1, got {search} + {insert}"
            ),
            ConfigError::Read { path, .. } => write!(f, "cannot read {}", path.display()),
            ConfigError::Parse(_) => f.write_str("malformed workload configuration"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse(source) => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = WorkloadConfig::default();
        config.validate().unwrap();
        assert!((config.delete_percent() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn rejects_zero_threads() {
        let config = WorkloadConfig {
            thread_count: 0,
            ..WorkloadConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoThreads)));
        assert_eq!(config.ops_per_thread(), 0);
    }

    #[test]
    fn rejects_out_of_range_fractions() {
        for (search, insert) in [(-0.1, 0.5), (1.5, 0.0), (0.2, f64::NAN)] {
            let config = WorkloadConfig {
                search_percent: search,
                insert_percent: insert,
                ..WorkloadConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::FractionOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn rejects_negative_delete_fraction() {
        let config = WorkloadConfig {
            search_percent: 0.7,
            insert_percent: 0.4,
            ..WorkloadConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MixExceedsOne { .. }));
        assert!(err.to_string().contains("must not exceed 1"));
    }

    #[test]
    fn choose_splits_unit_interval() {
        let config = WorkloadConfig {
            search_percent: 0.5,
            insert_percent: 0.25,
            ..WorkloadConfig::default()
        };
        assert_eq!(config.choose(0.0), Operation::Member);
        assert_eq!(config.choose(0.49), Operation::Member);
        assert_eq!(config.choose(0.5), Operation::Insert);
        assert_eq!(config.choose(0.74), Operation::Insert);
        assert_eq!(config.choose(0.75), Operation::Delete);
        assert_eq!(config.choose(0.999), Operation::Delete);
    }

    #[test]
    fn ops_split_evenly_dropping_remainder() {
        let config = WorkloadConfig {
            thread_count: 3,
            total_ops: 10,
            ..WorkloadConfig::default()
        };
        assert_eq!(config.ops_per_thread(), 3);
        assert_eq!(config.dispatched_ops(), 9);
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config =
            WorkloadConfig::from_json(r#"{ "policy": "rw-lock", "thread_count": 8 }"#).unwrap();
        assert_eq!(config.policy, PolicyKind::RwLock);
        assert_eq!(config.thread_count, 8);
        assert_eq!(config.total_ops, WorkloadConfig::default().total_ops);
    }

    #[test]
    fn json_rejects_unknown_fields() {
        let err = WorkloadConfig::from_json(r#"{ "threads": 8 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn policy_kind_names_match_policies() {
        let names: Vec<_> = PolicyKind::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["coarse", "fine-grained", "rw-lock"]);
    }
}
