//! Host configuration as seen by the resolver.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Protocol spoken by a host's management board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagementProtocol {
    Snmp,
    Ipmi,
}

impl std::fmt::Display for ManagementProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManagementProtocol::Snmp => write!(f, "snmp"),
            ManagementProtocol::Ipmi => write!(f, "ipmi"),
        }
    }
}

/// Read-only configuration of one monitored host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Name of the host
    pub hostname: String,

    /// Host tags
    pub tags: BTreeSet<String>,

    /// Whether this is a cluster host
    pub is_cluster: bool,

    /// Node hosts of a cluster, empty for physical hosts
    pub nodes: Vec<String>,

    /// Whether the host is monitored via SNMP
    pub is_snmp_host: bool,

    /// Whether the host is monitored via the agent (TCP)
    pub is_agent_host: bool,

    /// Protocol of the management board, if the host has one
    pub management_protocol: Option<ManagementProtocol>,

    /// Clusters this host is a node of
    pub part_of_clusters: Vec<String>,

    /// Ping-only hosts never run autodiscovered checks
    pub is_ping_host: bool,
}

impl HostConfig {
    /// Create a physical agent host without tags
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            tags: BTreeSet::new(),
            is_cluster: false,
            nodes: Vec::new(),
            is_snmp_host: false,
            is_agent_host: true,
            management_protocol: None,
            part_of_clusters: Vec::new(),
            is_ping_host: false,
        }
    }

    /// Turn the host into a cluster of the given nodes
    pub fn with_nodes(mut self, nodes: Vec<String>) -> Self {
        self.is_cluster = true;
        self.nodes = nodes;
        self
    }

    /// Set host tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable SNMP monitoring
    pub fn with_snmp(mut self, enable: bool) -> Self {
        self.is_snmp_host = enable;
        self
    }

    /// Enable or disable agent monitoring
    pub fn with_agent(mut self, enable: bool) -> Self {
        self.is_agent_host = enable;
        self
    }

    /// Set the management board protocol
    pub fn with_management(mut self, protocol: Option<ManagementProtocol>) -> Self {
        self.management_protocol = protocol;
        self
    }

    /// Set the clusters this host belongs to
    pub fn with_part_of_clusters(mut self, clusters: Vec<String>) -> Self {
        self.part_of_clusters = clusters;
        self
    }

    /// Mark the host as ping-only
    pub fn with_ping(mut self, enable: bool) -> Self {
        self.is_ping_host = enable;
        self
    }

    pub fn has_management_board(&self) -> bool {
        self.management_protocol.is_some()
    }

    /// Whether SNMP based checks may run on this host, directly or through
    /// an SNMP management board
    pub fn accepts_snmp_checks(&self) -> bool {
        self.is_snmp_host || self.management_protocol == Some(ManagementProtocol::Snmp)
    }

    /// Hosts monitored by agent and SNMP at the same time.
    ///
    /// Only these can end up with an SNMP and an agent check sharing one
    /// service description.
    pub fn is_dual_source(&self) -> bool {
        self.is_agent_host && self.accepts_snmp_checks()
    }
}
