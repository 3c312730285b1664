//! Interfaces the resolver consumes from the rest of the monitoring system.
//!
//! None of these are implemented by the resolver itself. [`crate::Registry`]
//! implements [`CheckCatalog`] and [`crate::MonitoringConfig`] implements the
//! remaining traits from configured rules; tests plug in their own fakes.

use serde_json::Value;

use crate::entry::RawEntry;
use crate::host::HostConfig;

/// Check definition registry
pub trait CheckCatalog: Send + Sync {
    /// Whether the check plugin is known
    fn exists(&self, check_id: &str) -> bool;

    /// Whether the check reads SNMP data
    fn is_snmp_sourced(&self, check_id: &str) -> bool;

    /// Whether the check reads agent data
    fn is_tcp_sourced(&self, check_id: &str) -> bool;

    /// Service description template of the check
    fn description_template(&self, check_id: &str) -> Option<&str>;

    /// Turn configured parameters into the form the check function consumes
    fn precompile_params(
        &self,
        _hostname: &str,
        _check_id: &str,
        _item: Option<&str>,
        params: Value,
    ) -> Value {
        params
    }
}

/// Service dependency rule evaluation
pub trait DependencyRules: Send + Sync {
    /// Descriptions of the services the given service depends on
    fn dependencies_of(&self, hostname: &str, description: &str) -> Vec<String>;
}

/// Decides which host a service belongs to
pub trait ServiceOwnership: Send + Sync {
    /// Host the service is assigned to: one of `part_of_clusters` for
    /// clustered services, `hostname` otherwise
    fn owner_of(&self, hostname: &str, description: &str, part_of_clusters: &[String]) -> String;
}

/// Ignore rule evaluation
pub trait IgnoreRules: Send + Sync {
    fn is_ignored(&self, hostname: &str, check_id: &str, description: &str) -> bool;
}

/// Computes effective check parameters for a host
pub trait ParameterMerge: Send + Sync {
    fn compute_params(
        &self,
        hostname: &str,
        check_id: &str,
        item: Option<&str>,
        raw_params: &Value,
    ) -> Value;
}

/// Lookup of host configurations by name
pub trait HostConfigProvider: Send + Sync {
    fn host_config(&self, hostname: &str) -> Option<&HostConfig>;
}

/// Autodiscovered and statically configured check entries
pub trait CheckEntrySource: Send + Sync {
    /// Autodiscovered checks of a host
    fn autochecks_of(&self, hostname: &str) -> &[RawEntry];

    /// Static checks configured for exactly this host
    fn single_host_checks(&self, hostname: &str) -> &[RawEntry];

    /// Static checks that may match any host
    fn multi_host_checks(&self) -> &[RawEntry];
}

/// Everything a resolution reads, bundled by reference
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    pub catalog: &'a dyn CheckCatalog,
    pub hosts: &'a dyn HostConfigProvider,
    pub entries: &'a dyn CheckEntrySource,
    pub dependencies: &'a dyn DependencyRules,
    pub ownership: &'a dyn ServiceOwnership,
    pub ignored: &'a dyn IgnoreRules,
    pub parameters: &'a dyn ParameterMerge,
}
