//! Check parameter rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{selects, ServicePattern};
use crate::matching::{HostList, TagPredicate};

/// Parameters for one check plugin on the selected hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRule {
    #[serde(default)]
    pub tags: TagPredicate,
    #[serde(default)]
    pub hosts: HostList,
    pub check: String,
    /// Restricts the rule to matching items; absent matches every item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ServicePattern>>,
    pub value: Value,
}

impl ParameterRule {
    pub fn applies(
        &self,
        hostname: &str,
        host_tags: &BTreeSet<String>,
        check_id: &str,
        item: Option<&str>,
    ) -> bool {
        if self.check != check_id {
            return false;
        }

        let item_matches = match (&self.items, item) {
            (None, _) => true,
            (Some(patterns), Some(item)) => patterns.iter().any(|pattern| pattern.matches(item)),
            (Some(_), None) => false,
        };

        item_matches && selects(&self.tags, &self.hosts, hostname, host_tags)
    }
}

/// Overlay `overlay` onto `base`.
///
/// Objects are merged key by key, any other value replaces the base. A null
/// overlay leaves the base untouched.
pub fn merge_params(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                base.insert(key.clone(), value.clone());
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}
