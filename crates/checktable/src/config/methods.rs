//! Loading, validation and the collaborator implementations of the
//! monitoring configuration.

use std::collections::{BTreeSet, HashMap};
use std::{env, fmt, fs, path};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, info};

use super::types::{ConfigFile, HostSpec, MonitoringConfig};
use crate::cache::CheckTableCache;
use crate::collaborators::{
    CheckEntrySource, DependencyRules, HostConfigProvider, IgnoreRules, ParameterMerge,
    ResolverContext, ServiceOwnership,
};
use crate::entry::RawEntry;
use crate::error::ConfigError;
use crate::host::HostConfig;
use crate::registry::{CheckDefinition, CheckSource, Registry};
use crate::resolver::CheckTableResolver;
use crate::rules::RuleSet;

static NO_TAGS: BTreeSet<String> = BTreeSet::new();

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/checktable/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("checktable/config.toml"))
}

fn host_config(spec: &HostSpec, part_of_clusters: Vec<String>) -> HostConfig {
    let mut host = HostConfig::new(&spec.name)
        .with_tags(&spec.tags)
        .with_agent(spec.agent)
        .with_snmp(spec.snmp)
        .with_management(spec.management)
        .with_part_of_clusters(part_of_clusters)
        .with_ping(spec.is_ping_host());

    if spec.is_cluster() {
        host = host.with_nodes(spec.nodes.clone());
    }
    host
}

impl MonitoringConfig {
    /// Validate a configuration file and index it for resolution
    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let mut registry = Registry::new();
        for check in &file.checks {
            let mut definition = CheckDefinition::new(&check.template, check.source);
            if let Some(params) = &check.default_params {
                definition = definition.with_default_params(params.clone());
            }
            registry.register(&check.name, definition);
        }

        let known: BTreeSet<&str> = file.hosts.iter().map(|host| host.name.as_str()).collect();
        let mut clusters_of: HashMap<&str, Vec<String>> = HashMap::new();
        for cluster in file.hosts.iter().filter(|host| host.is_cluster()) {
            for node in &cluster.nodes {
                if !known.contains(node.as_str()) {
                    return Err(ConfigError::UnknownNode {
                        cluster: cluster.name.clone(),
                        node: node.clone(),
                    });
                }
                clusters_of.entry(node.as_str()).or_default().push(cluster.name.clone());
            }
        }

        let mut hosts = HashMap::new();
        let mut autochecks = HashMap::new();
        for spec in &file.hosts {
            let part_of_clusters = match &spec.part_of_clusters {
                Some(clusters) => clusters.clone(),
                None => clusters_of.get(spec.name.as_str()).cloned().unwrap_or_default(),
            };
            let host = host_config(spec, part_of_clusters);

            // discovered parameters are completed by defaults and rules right away
            let entries: Vec<RawEntry> = spec
                .autochecks
                .iter()
                .map(|check| {
                    let params = file.rules.compute_params(
                        &spec.name,
                        &host.tags,
                        &check.check,
                        check.item.as_deref(),
                        registry.default_params(&check.check),
                        &check.params,
                    );
                    RawEntry::autocheck(&check.check, check.item.as_deref(), params)
                })
                .collect();

            autochecks.insert(spec.name.clone(), entries);
            hosts.insert(spec.name.clone(), host);
        }

        let mut single_host_checks: HashMap<String, Vec<RawEntry>> = HashMap::new();
        let mut multi_host_checks = Vec::new();
        for check in &file.static_checks {
            let entry = check.to_rule()?;
            match entry.single_host() {
                Some(hostname) => {
                    single_host_checks.entry(hostname.to_string()).or_default().push(entry)
                }
                None => multi_host_checks.push(entry),
            }
        }

        debug!(
            checks = registry.len(),
            hosts = hosts.len(),
            single_host_checks = single_host_checks.values().map(Vec::len).sum::<usize>(),
            multi_host_checks = multi_host_checks.len(),
            "loaded monitoring configuration"
        );

        Ok(Self { file, registry, hosts, autochecks, single_host_checks, multi_host_checks })
    }

    /// Parse and validate a configuration from TOML
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(raw)?;
        Self::from_file(file)
    }

    /// Generate MonitoringConfig from file
    ///
    /// Creates an empty config in ~/.config/checktable/config.toml
    ///  or the specified path, with the extension .toml if one does not exist
    ///
    /// ```no_run
    /// # use std::path;
    /// let cfg = checktable::MonitoringConfig::from_config(None::<&path::Path>)?;
    /// println!("{}", cfg);
    /// # Ok::<(), checktable::ConfigError>(())
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path)
                .map_err(|source| ConfigError::ReadFailed { path: config_path.clone(), source })?;
            Self::parse(&raw_string)
        } else {
            info!(path = %config_path.display(), "writing default configuration");
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String = toml::to_string_pretty(&self.file)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::WriteFailed { path: parent.to_path_buf(), source })?;
        }

        fs::write(path, config_str)
            .map_err(|source| ConfigError::WriteFailed { path: path.to_path_buf(), source })
    }

    /// Configuration file the configuration was loaded from
    pub fn file(&self) -> &ConfigFile {
        &self.file
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable registry, for registering parameter precompilers
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn rules(&self) -> &RuleSet {
        &self.file.rules
    }

    pub fn host(&self, hostname: &str) -> Option<&HostConfig> {
        self.hosts.get(hostname)
    }

    /// All hosts in name order
    pub fn hosts(&self) -> impl Iterator<Item = &HostConfig> {
        let mut hosts: Vec<&HostConfig> = self.hosts.values().collect();
        hosts.sort_by(|a, b| a.hostname.cmp(&b.hostname));
        hosts.into_iter()
    }

    /// Resolver collaborators backed by this configuration
    pub fn resolver_context(&self) -> ResolverContext<'_> {
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

    /// Resolver over this configuration using `cache`
    pub fn resolver<'a>(&'a self, cache: &'a CheckTableCache) -> CheckTableResolver<'a> {
        CheckTableResolver::new(self.resolver_context(), cache)
    }

    fn tags_of(&self, hostname: &str) -> &BTreeSet<String> {
        self.hosts.get(hostname).map(|host| &host.tags).unwrap_or(&NO_TAGS)
    }
}

impl fmt::Debug for MonitoringConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitoringConfig")
            .field("registry", &self.registry)
            .field("hosts", &self.hosts.len())
            .field("multi_host_checks", &self.multi_host_checks.len())
            .finish_non_exhaustive()
    }
}

impl Serialize for MonitoringConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.file.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MonitoringConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let file = ConfigFile::deserialize(deserializer)?;
        Self::from_file(file).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for MonitoringConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);
        let rules = &self.file.rules;

        writeln!(f, "Current Monitoring Configuration:")?;

        write_title_1(f, "Checks")?;
        for (name, definition) in self.registry.iter() {
            write_1(f, name, &format!("{:?} ({})", definition.template, source_name(definition)))?;
        }

        write_title_1(f, "Hosts")?;
        for host in self.hosts() {
            write_1(f, &host.hostname, &describe_host(host))?;
        }

        write_title_1(f, "Static Checks")?;
        write_1(f, "Single Host", &self.single_host_checks.values().map(Vec::len).sum::<usize>())?;
        write_1(f, "Multi Host", &self.multi_host_checks.len())?;

        write_title_1(f, "Rules")?;
        write_1(f, "Ignored Check Types", &rules.ignored_checktypes.len())?;
        write_1(f, "Ignored Checks", &rules.ignored_checks.len())?;
        write_1(f, "Ignored Services", &rules.ignored_services.len())?;
        write_1(f, "Service Dependencies", &rules.service_dependencies.len())?;
        write_1(f, "Clustered Services", &rules.clustered_services.len())?;
        write_1(f, "Check Parameters", &rules.check_parameters.len())?;

        Ok(())
    }
}

fn source_name(definition: &CheckDefinition) -> &'static str {
    match definition.source {
        CheckSource::Tcp => "tcp",
        CheckSource::Snmp => "snmp",
    }
}

fn describe_host(host: &HostConfig) -> String {
    let mut traits = Vec::new();
    if host.is_cluster {
        traits.push(format!("cluster of [{}]", host.nodes.join(", ")));
    }
    if host.is_agent_host {
        traits.push("agent".to_string());
    }
    if host.is_snmp_host {
        traits.push("snmp".to_string());
    }
    if let Some(protocol) = host.management_protocol {
        traits.push(format!("management {protocol}"));
    }
    if host.is_ping_host {
        traits.push("ping".to_string());
    }
    if !host.tags.is_empty() {
        let tags: Vec<&str> = host.tags.iter().map(String::as_str).collect();
        traits.push(format!("tags {}", tags.join(",")));
    }
    traits.join(", ")
}

impl HostConfigProvider for MonitoringConfig {
    fn host_config(&self, hostname: &str) -> Option<&HostConfig> {
        self.hosts.get(hostname)
    }
}

impl CheckEntrySource for MonitoringConfig {
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

impl DependencyRules for MonitoringConfig {
    fn dependencies_of(&self, hostname: &str, description: &str) -> Vec<String> {
        self.file.rules.dependencies_of(hostname, self.tags_of(hostname), description)
    }
}

impl ServiceOwnership for MonitoringConfig {
    fn owner_of(&self, hostname: &str, description: &str, part_of_clusters: &[String]) -> String {
        self.file.rules.owner_of(hostname, self.tags_of(hostname), description, part_of_clusters)
    }
}

impl IgnoreRules for MonitoringConfig {
    fn is_ignored(&self, hostname: &str, check_id: &str, description: &str) -> bool {
        self.file.rules.is_ignored(hostname, self.tags_of(hostname), check_id, description)
    }
}

impl ParameterMerge for MonitoringConfig {
    fn compute_params(
        &self,
        hostname: &str,
        check_id: &str,
        item: Option<&str>,
        raw_params: &Value,
    ) -> Value {
        self.file.rules.compute_params(
            hostname,
            self.tags_of(hostname),
            check_id,
            item,
            self.registry.default_params(check_id),
            raw_params,
        )
    }
}
