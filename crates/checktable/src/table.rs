//! Check table types.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniqueness key of a check within one host's table
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CheckTableKey {
    pub check_id: String,
    pub item: Option<String>,
}

impl CheckTableKey {
    pub fn new(check_id: impl Into<String>, item: Option<&str>) -> Self {
        Self { check_id: check_id.into(), item: item.map(str::to_string) }
    }
}

impl std::fmt::Display for CheckTableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.item {
            Some(item) => write!(f, "{}/{}", self.check_id, item),
            None => write!(f, "{}", self.check_id),
        }
    }
}

/// What a host runs for one key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckTableValue {
    /// Effective parameters, opaque to the resolver
    pub params: Value,

    /// Service description
    pub description: String,

    /// Descriptions of the services this one depends on
    pub dependencies: Vec<String>,
}

impl CheckTableValue {
    pub fn new(params: Value, description: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self { params, description: description.into(), dependencies }
    }
}

/// Unordered check table of a host, iterated in insertion order
pub type CheckTable = IndexMap<CheckTableKey, CheckTableValue>;

/// Drop dependencies on services that are not part of the table
pub fn prune_dangling(table: &mut CheckTable) {
    let descriptions: HashSet<String> =
        table.values().map(|value| value.description.clone()).collect();

    for value in table.values_mut() {
        value.dependencies.retain(|dependency| descriptions.contains(dependency));
    }
}

/// One entry of a dependency sorted check table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortedCheck {
    pub check_id: String,
    pub item: Option<String>,
    pub params: Value,
    pub description: String,
    pub dependencies: Vec<String>,
}

impl SortedCheck {
    pub fn from_entry(key: &CheckTableKey, value: &CheckTableValue) -> Self {
        Self {
            check_id: key.check_id.clone(),
            item: key.item.clone(),
            params: value.params.clone(),
            description: value.description.clone(),
            dependencies: value.dependencies.clone(),
        }
    }
}

/// Check ready for execution: parameters precompiled, dependencies dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecompiledCheck {
    pub check_id: String,
    pub item: Option<String>,
    pub params: Value,
    pub description: String,
}
