//! Rule sets feeding the resolver's collaborators.
//!
//! Every rule selects hosts by tag predicate and host list. Rules about
//! services additionally match service descriptions with [`ServicePattern`]s,
//! regular expressions anchored at the start of the description.

mod clustered;
mod dependencies;
mod ignore;
mod parameters;

pub use clustered::ClusteredServiceRule;
pub use dependencies::DependencyRule;
pub use ignore::{IgnoredCheckRule, IgnoredServiceRule};
pub use parameters::{merge_params, ParameterRule};

use std::collections::BTreeSet;
use std::fmt;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::matching::{HostList, TagPredicate};

/// Prefix match on service descriptions
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServicePattern {
    pattern: String,
    regex: Regex,
}

impl ServicePattern {
    pub fn new(pattern: impl Into<String>) -> Result<Self, ConfigError> {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
            ConfigError::InvalidServicePattern { pattern: pattern.clone(), source }
        })?;
        Ok(Self { pattern, regex })
    }

    pub fn matches(&self, description: &str) -> bool {
        self.regex.is_match(description)
    }

    pub fn captures<'t>(&self, description: &'t str) -> Option<Captures<'t>> {
        self.regex.captures(description)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Debug for ServicePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServicePattern").field(&self.pattern).finish()
    }
}

impl PartialEq for ServicePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl TryFrom<String> for ServicePattern {
    type Error = ConfigError;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        Self::new(pattern)
    }
}

impl From<ServicePattern> for String {
    fn from(pattern: ServicePattern) -> Self {
        pattern.pattern
    }
}

/// Whether a rule's host selection applies to a host
fn selects(
    tags: &TagPredicate,
    hosts: &HostList,
    hostname: &str,
    host_tags: &BTreeSet<String>,
) -> bool {
    hosts.matches(hostname) && tags.matches(host_tags)
}

/// All configured rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Check plugins ignored on every host
    pub ignored_checktypes: Vec<String>,
    pub ignored_checks: Vec<IgnoredCheckRule>,
    pub ignored_services: Vec<IgnoredServiceRule>,
    pub service_dependencies: Vec<DependencyRule>,
    pub clustered_services: Vec<ClusteredServiceRule>,
    pub check_parameters: Vec<ParameterRule>,
}

impl RuleSet {
    pub fn is_empty(&self) -> bool {
        self.ignored_checktypes.is_empty()
            && self.ignored_checks.is_empty()
            && self.ignored_services.is_empty()
            && self.service_dependencies.is_empty()
            && self.clustered_services.is_empty()
            && self.check_parameters.is_empty()
    }

    /// Whether the service is excluded by an ignore rule
    pub fn is_ignored(
        &self,
        hostname: &str,
        host_tags: &BTreeSet<String>,
        check_id: &str,
        description: &str,
    ) -> bool {
        self.ignored_checktypes.iter().any(|ignored| ignored == check_id)
            || self.ignored_checks.iter().any(|rule| rule.ignores(hostname, host_tags, check_id))
            || self
                .ignored_services
                .iter()
                .any(|rule| rule.ignores(hostname, host_tags, description))
    }

    /// Dependencies declared for a service, in rule order without repeats
    pub fn dependencies_of(
        &self,
        hostname: &str,
        host_tags: &BTreeSet<String>,
        description: &str,
    ) -> Vec<String> {
        let mut dependencies: Vec<String> = Vec::new();
        for rule in &self.service_dependencies {
            for dependency in rule.dependencies(hostname, host_tags, description) {
                if !dependencies.contains(&dependency) {
                    dependencies.push(dependency);
                }
            }
        }
        dependencies
    }

    /// Host a service is assigned to.
    ///
    /// Rules naming one of the host's clusters are consulted first, then
    /// rules without a cluster, which assign the service to the first
    /// cluster of the host.
    pub fn owner_of(
        &self,
        hostname: &str,
        host_tags: &BTreeSet<String>,
        description: &str,
        part_of_clusters: &[String],
    ) -> String {
        let Some(first_cluster) = part_of_clusters.first() else {
            return hostname.to_string();
        };

        let matching: Vec<&ClusteredServiceRule> = self
            .clustered_services
            .iter()
            .filter(|rule| rule.clusters(hostname, host_tags, description))
            .collect();

        let explicit = matching.iter().find_map(|rule| {
            rule.cluster.as_ref().filter(|cluster| part_of_clusters.contains(cluster))
        });
        if let Some(cluster) = explicit {
            return cluster.clone();
        }

        if matching.iter().any(|rule| rule.cluster.is_none()) {
            return first_cluster.clone();
        }

        hostname.to_string()
    }

    /// Effective parameters: factory defaults, overlaid with the entry's own
    /// parameters, overlaid with matching parameter rules where the first
    /// matching rule has precedence
    pub fn compute_params(
        &self,
        hostname: &str,
        host_tags: &BTreeSet<String>,
        check_id: &str,
        item: Option<&str>,
        defaults: Option<&Value>,
        raw_params: &Value,
    ) -> Value {
        let mut params = match defaults {
            Some(defaults) if !raw_params.is_null() => {
                let mut params = defaults.clone();
                merge_params(&mut params, raw_params);
                params
            }
            Some(defaults) => defaults.clone(),
            None => raw_params.clone(),
        };

        let matching: Vec<&ParameterRule> = self
            .check_parameters
            .iter()
            .filter(|rule| rule.applies(hostname, host_tags, check_id, item))
            .collect();

        for rule in matching.iter().rev() {
            merge_params(&mut params, &rule.value);
        }

        params
    }
}
