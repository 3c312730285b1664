//! Assignment of node services to clusters.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{selects, ServicePattern};
use crate::matching::{HostList, TagPredicate};

/// Marks services of the selected nodes as clustered.
///
/// Without `cluster` the services go to the first cluster the node is part
/// of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteredServiceRule {
    #[serde(default)]
    pub tags: TagPredicate,
    #[serde(default)]
    pub hosts: HostList,
    pub services: Vec<ServicePattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
}

impl ClusteredServiceRule {
    /// Whether the rule clusters the node's service
    pub fn clusters(
        &self,
        hostname: &str,
        host_tags: &BTreeSet<String>,
        description: &str,
    ) -> bool {
        self.services.iter().any(|service| service.matches(description))
            && selects(&self.tags, &self.hosts, hostname, host_tags)
    }
}
