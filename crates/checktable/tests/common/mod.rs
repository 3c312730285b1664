//! In-memory collaborators for resolver tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use serde_json::{json, Value};

use checktable::{
    CheckDefinition, CheckEntrySource, CheckSource, DependencyRules, HostConfig,
    HostConfigProvider, IgnoreRules, ParameterMerge, RawEntry, Registry, ResolverContext,
    ServiceOwnership,
};

/// A monitoring world assembled in code
#[derive(Default)]
pub struct World {
    pub registry: Registry,
    hosts: HashMap<String, HostConfig>,
    autochecks: HashMap<String, Vec<RawEntry>>,
    single_host_checks: HashMap<String, Vec<RawEntry>>,
    multi_host_checks: Vec<RawEntry>,
    dependencies: HashMap<String, Vec<String>>,
    clustered: HashMap<String, String>,
    ignored: HashSet<String>,
    mark_params: bool,
}

impl World {
    pub fn new() -> Self {
        Self::default()
            .with_check("df", "df %s", CheckSource::Tcp)
            .with_check("cpu", "CPU load", CheckSource::Tcp)
            .with_check("mem", "Memory", CheckSource::Tcp)
            .with_check("snmp_df", "df %s", CheckSource::Snmp)
            .with_check("snmp_uptime", "Uptime", CheckSource::Snmp)
            .with_check("uptime", "Uptime", CheckSource::Tcp)
    }

    pub fn with_check(mut self, check_id: &str, template: &str, source: CheckSource) -> Self {
        self.registry.register(check_id, CheckDefinition::new(template, source));
        self
    }

    pub fn with_host(mut self, host: HostConfig) -> Self {
        self.hosts.insert(host.hostname.clone(), host);
        self
    }

    pub fn with_autocheck(
        mut self,
        hostname: &str,
        check_id: &str,
        item: Option<&str>,
        params: Value,
    ) -> Self {
        self.autochecks
            .entry(hostname.to_string())
            .or_default()
            .push(RawEntry::autocheck(check_id, item, params));
        self
    }

    /// Add a static rule, filed the way a configuration loader files it
    pub fn with_rule(mut self, entry: RawEntry) -> Self {
        match entry.single_host() {
            Some(hostname) => {
                self.single_host_checks.entry(hostname.to_string()).or_default().push(entry)
            }
            None => self.multi_host_checks.push(entry),
        }
        self
    }

    pub fn with_dependency(mut self, description: &str, depends_on: &[&str]) -> Self {
        self.dependencies
            .insert(description.to_string(), depends_on.iter().map(|d| d.to_string()).collect());
        self
    }

    /// Assign a service to a cluster, for nodes of that cluster
    pub fn with_clustered(mut self, description: &str, cluster: &str) -> Self {
        self.clustered.insert(description.to_string(), cluster.to_string());
        self
    }

    pub fn with_ignored(mut self, description: &str) -> Self {
        self.ignored.insert(description.to_string());
        self
    }

    /// Make computed parameters record the host they were computed for
    pub fn with_marked_params(mut self) -> Self {
        self.mark_params = true;
        self
    }

    pub fn host(&self, hostname: &str) -> &HostConfig {
        &self.hosts[hostname]
    }

    pub fn context(&self) -> ResolverContext<'_> {
        ResolverContext {
            catalog: &self.registry,
            hosts: self,
            entries: self,
            dependencies: self,
            ownership: self,
            ignored: self,
            parameters: self,
        }
    }
}

impl HostConfigProvider for World {
    fn host_config(&self, hostname: &str) -> Option<&HostConfig> {
        self.hosts.get(hostname)
    }
}

impl CheckEntrySource for World {
    fn autochecks_of(&self, hostname: &str) -> &[RawEntry] {
        self.autochecks.get(hostname).map(Vec::as_slice).unwrap_or(&[])
    }

    fn single_host_checks(&self, hostname: &str) -> &[RawEntry] {
        self.single_host_checks.get(hostname).map(Vec::as_slice).unwrap_or(&[])
    }

    fn multi_host_checks(&self) -> &[RawEntry] {
        &self.multi_host_checks
    }
}

impl DependencyRules for World {
    fn dependencies_of(&self, _hostname: &str, description: &str) -> Vec<String> {
        self.dependencies.get(description).cloned().unwrap_or_default()
    }
}

impl ServiceOwnership for World {
    fn owner_of(&self, hostname: &str, description: &str, part_of_clusters: &[String]) -> String {
        match self.clustered.get(description) {
            Some(cluster) if part_of_clusters.contains(cluster) => cluster.clone(),
            _ => hostname.to_string(),
        }
    }
}

impl IgnoreRules for World {
    fn is_ignored(&self, _hostname: &str, _check_id: &str, description: &str) -> bool {
        self.ignored.contains(description)
    }
}

impl ParameterMerge for World {
    fn compute_params(
        &self,
        hostname: &str,
        _check_id: &str,
        _item: Option<&str>,
        raw_params: &Value,
    ) -> Value {
        if self.mark_params {
            json!({ "computed_for": hostname, "raw": raw_params })
        } else {
            raw_params.clone()
        }
    }
}
