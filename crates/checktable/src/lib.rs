//! Checktable - check table resolution for monitored hosts
//!
//! This library computes the definitive set of checks a monitoring host has
//! to run: autodiscovered checks and rule based checks are expanded against
//! the host's tags and connectivity, clustered services are moved to their
//! owning cluster, SNMP duplicates of agent checks are dropped and the result
//! is ordered by service dependencies.

pub mod cache;
pub mod collaborators;
pub mod config;
pub mod description;
pub mod entry;
pub mod error;
pub mod host;
pub mod matching;
pub mod registry;
pub mod resolver;
pub mod rules;
pub mod table;

// Re-export main types
pub use cache::CheckTableCache;
pub use collaborators::{
    CheckCatalog, CheckEntrySource, DependencyRules, HostConfigProvider, IgnoreRules,
    ParameterMerge, ResolverContext, ServiceOwnership,
};
pub use config::MonitoringConfig;
pub use entry::{CanonicalEntry, EntrySource, EntryTable, HostPattern, RawEntry};
pub use error::{ConfigError, CyclicDependencyError, ResolveError};
pub use host::{HostConfig, ManagementProtocol};
pub use registry::{CheckDefinition, CheckSource, Registry};
pub use resolver::{CheckTableResolver, FilterMode, ResolveOptions};
pub use rules::{RuleSet, ServicePattern};
pub use table::{CheckTable, CheckTableKey, CheckTableValue, PrecompiledCheck, SortedCheck};

/// Library result type
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
