//! Error types for check table resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed configuration: rule entries, tag predicates, host lists, rule
/// patterns or the configuration file itself.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid entry length: entry has {0} fields, but must have 3, 4 or 5")]
    InvalidEntryLength(usize),

    #[error("invalid entry: entry must be a list of fields")]
    EntryNotList,

    #[error("invalid entry: tag predicate must be a list")]
    TagPredicateNotList,

    #[error("invalid entry: check identifier is missing")]
    MissingCheckId,

    #[error("invalid rule: a host pattern is required")]
    MissingHostPattern,

    #[error("invalid entry: check identifier must be a string")]
    CheckIdNotString,

    #[error("invalid entry: item must be a string or null")]
    ItemNotString,

    #[error("malformed tag predicate element {0:?}")]
    MalformedTag(String),

    #[error("invalid host pattern: must be a single hostname or a list of hostnames")]
    MalformedHostPattern,

    #[error("empty hostname in host list {0:?}")]
    EmptyHostname(Vec<String>),

    #[error("invalid service pattern {pattern:?}: {source}")]
    InvalidServicePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("cluster {cluster} lists unknown node {node}")]
    UnknownNode { cluster: String, node: String },

    #[error("no configuration path available (neither XDG_CONFIG_HOME nor HOME is set)")]
    ConfigPathUnavailable,

    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
}

/// Service dependencies of a host that cannot be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "cyclic service dependency of host {hostname}; problematic are: {}",
    .descriptions.join(",")
)]
pub struct CyclicDependencyError {
    /// Host whose table could not be sorted
    pub hostname: String,

    /// Descriptions left over when no further entry could be ordered, sorted
    pub descriptions: Vec<String>,
}

/// Failure of a check table resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    CyclicDependency(#[from] CyclicDependencyError),

    #[error("unknown host {0}")]
    UnknownHost(String),
}
