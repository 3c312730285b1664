//! Configuration file layout and the loaded configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entry::{EntryTable, RawEntry};
use crate::error::ConfigError;
use crate::host::{HostConfig, ManagementProtocol};
use crate::registry::{CheckSource, Registry};
use crate::rules::RuleSet;

fn default_true() -> bool {
    true
}

/// Configuration file as written on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub checks: Vec<CheckSpec>,
    pub hosts: Vec<HostSpec>,
    pub static_checks: Vec<StaticCheck>,
    pub rules: RuleSet,
}

/// A check plugin definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSpec {
    pub name: String,
    /// Service description template, `%s` is replaced by the item
    pub template: String,
    pub source: CheckSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_params: Option<Value>,
}

/// A monitored host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSpec {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub agent: bool,
    #[serde(default)]
    pub snmp: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management: Option<ManagementProtocol>,
    /// Derived from the connectivity flags when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping: Option<bool>,
    #[serde(default)]
    pub cluster: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<String>,
    /// Derived from the clusters' node lists when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_clusters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub autochecks: Vec<AutocheckSpec>,
}

impl HostSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            agent: true,
            snmp: false,
            management: None,
            ping: None,
            cluster: false,
            nodes: Vec::new(),
            part_of_clusters: None,
            autochecks: Vec::new(),
        }
    }

    pub fn is_cluster(&self) -> bool {
        self.cluster || !self.nodes.is_empty()
    }

    /// Explicit ping flag, otherwise hosts without any data source
    pub fn is_ping_host(&self) -> bool {
        self.ping.unwrap_or(
            !self.is_cluster() && !self.snmp && !self.agent && self.management.is_none(),
        )
    }
}

/// An autodiscovered check of a host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocheckSpec {
    pub check: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

/// A static check rule, in positional form or as table.
///
/// Arrays are always read positionally so that their length is validated.
/// Fields are checked when the configuration is loaded, and a rule without
/// host pattern is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StaticCheck {
    Positional(Vec<Value>),
    Table(EntryTable),
}

impl StaticCheck {
    /// The checked rule entry
    pub fn to_rule(&self) -> Result<RawEntry, ConfigError> {
        let entry = match self {
            StaticCheck::Table(table) => RawEntry::try_from(table)?,
            StaticCheck::Positional(fields) => {
                RawEntry::try_from(&Value::Array(fields.clone()))?
            }
        };
        if entry.is_rule() { Ok(entry) } else { Err(ConfigError::MissingHostPattern) }
    }
}

/// A loaded and validated monitoring configuration
#[derive(Default)]
pub struct MonitoringConfig {
    pub(super) file: ConfigFile,
    pub(super) registry: Registry,
    pub(super) hosts: HashMap<String, HostConfig>,
    pub(super) autochecks: HashMap<String, Vec<RawEntry>>,
    pub(super) single_host_checks: HashMap<String, Vec<RawEntry>>,
    pub(super) multi_host_checks: Vec<RawEntry>,
}
