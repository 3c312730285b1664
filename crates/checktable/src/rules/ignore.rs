//! Rules removing checks or services from hosts.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{selects, ServicePattern};
use crate::matching::{HostList, TagPredicate};

/// Ignores check plugins on the selected hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnoredCheckRule {
    #[serde(default)]
    pub tags: TagPredicate,
    #[serde(default)]
    pub hosts: HostList,
    pub checks: Vec<String>,
}

impl IgnoredCheckRule {
    pub fn ignores(&self, hostname: &str, host_tags: &BTreeSet<String>, check_id: &str) -> bool {
        self.checks.iter().any(|check| check == check_id)
            && selects(&self.tags, &self.hosts, hostname, host_tags)
    }
}

/// Ignores services by description on the selected hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnoredServiceRule {
    #[serde(default)]
    pub tags: TagPredicate,
    #[serde(default)]
    pub hosts: HostList,
    pub services: Vec<ServicePattern>,
}

impl IgnoredServiceRule {
    pub fn ignores(&self, hostname: &str, host_tags: &BTreeSet<String>, description: &str) -> bool {
        self.services.iter().any(|service| service.matches(description))
            && selects(&self.tags, &self.hosts, hostname, host_tags)
    }
}
