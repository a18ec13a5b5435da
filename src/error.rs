//! Error type shared by every generation stage.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::ResourceKind;

/// Errors that abort a generation run.
///
/// Every variant is fatal: nothing is published once one of these is
/// returned.
#[derive(Debug, Error)]
pub enum GenError {
    /// One or more keys were seen twice (same qualifier set, repeated in
    /// shard input, or owned by two shards).
    #[error("duplicate resource key(s): {}", keys.join(", "))]
    DuplicateKey { keys: Vec<String> },

    /// Two shards would be written to the same module.
    #[error("shard name `{name}` is used twice; give each kind its own shard prefix")]
    DuplicateShardName { name: String },

    /// A shard holds more resources than its capacity.
    #[error("shard `{shard}` holds {len} resources, capacity is {capacity}")]
    ShardOverflow {
        shard: String,
        len: usize,
        capacity: usize,
    },

    /// Shard input was not sorted by suffix.
    #[error("resource keys are not sorted: `{previous}` comes before `{next}`")]
    UnsortedKeys { previous: String, next: String },

    /// Resources of different kinds were passed to one shard assignment.
    #[error("cannot shard `{found}` together with {expected} resources")]
    MixedKinds {
        expected: ResourceKind,
        found: String,
    },

    /// A key or identifier that cannot be emitted.
    #[error("invalid resource key `{key}`: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// A manifest could not be read or parsed.
    #[error("manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    /// A manifest glob pattern is malformed.
    #[error("invalid manifest pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// Filesystem failure while staging, publishing or checking output.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Template parsing or rendering failed.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The output directory exists but was not produced by resgen.
    #[error("refusing to replace {}: not a resgen output directory", path.display())]
    ForeignOutput { path: PathBuf },
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = GenError> = std::result::Result<T, E>;
