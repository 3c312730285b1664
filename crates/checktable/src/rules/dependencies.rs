//! Service dependency rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{selects, ServicePattern};
use crate::matching::{HostList, TagPredicate};

/// Declares the services a service depends on.
///
/// Dependency descriptions may refer to capture groups of the service
/// pattern: `$1` or `${name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRule {
    #[serde(default)]
    pub tags: TagPredicate,
    #[serde(default)]
    pub hosts: HostList,
    pub service: ServicePattern,
    pub depends_on: Vec<String>,
}

impl DependencyRule {
    pub fn dependencies(
        &self,
        hostname: &str,
        host_tags: &BTreeSet<String>,
        description: &str,
    ) -> Vec<String> {
        if !selects(&self.tags, &self.hosts, hostname, host_tags) {
            return Vec::new();
        }

        let Some(captures) = self.service.captures(description) else {
            return Vec::new();
        };

        self.depends_on
            .iter()
            .map(|template| {
                let mut dependency = String::new();
                captures.expand(template, &mut dependency);
                dependency
            })
            .collect()
    }
}
