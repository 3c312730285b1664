//! Check definition registry.
//!
//! The registry is built once at start-up from the known check plugins and
//! handed to the resolver by reference.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collaborators::CheckCatalog;

/// Data source a check reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckSource {
    /// Agent output fetched over TCP
    Tcp,
    /// SNMP walks
    Snmp,
}

/// Static definition of a check plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckDefinition {
    /// Service description template, `%s` is replaced by the item
    pub template: String,

    /// Where the check gets its data from
    pub source: CheckSource,

    /// Factory default parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_params: Option<Value>,
}

impl CheckDefinition {
    pub fn new(template: impl Into<String>, source: CheckSource) -> Self {
        Self { template: template.into(), source, default_params: None }
    }

    /// Set factory default parameters
    pub fn with_default_params(mut self, params: Value) -> Self {
        self.default_params = Some(params);
        self
    }
}

/// Parameter precompilation hook of a check: `(hostname, item, params)`
pub type Precompiler = Box<dyn Fn(&str, Option<&str>, &Value) -> Value + Send + Sync>;

/// Registry of all known checks
#[derive(Default)]
pub struct Registry {
    checks: HashMap<String, CheckDefinition>,
    precompilers: HashMap<String, Precompiler>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check definition, replacing an older one with the same name
    pub fn register(&mut self, check_id: impl Into<String>, definition: CheckDefinition) {
        self.checks.insert(check_id.into(), definition);
    }

    /// Builder style variant of [`Registry::register`]
    pub fn with_check(mut self, check_id: impl Into<String>, definition: CheckDefinition) -> Self {
        self.register(check_id, definition);
        self
    }

    /// Register a parameter precompilation hook for a check
    pub fn register_precompiler<F>(&mut self, check_id: impl Into<String>, precompile: F)
    where
        F: Fn(&str, Option<&str>, &Value) -> Value + Send + Sync + 'static,
    {
        self.precompilers.insert(check_id.into(), Box::new(precompile));
    }

    pub fn get(&self, check_id: &str) -> Option<&CheckDefinition> {
        self.checks.get(check_id)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Iterate over all check definitions in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CheckDefinition)> {
        let mut checks: Vec<_> = self.checks.iter().map(|(id, def)| (id.as_str(), def)).collect();
        checks.sort_by(|a, b| a.0.cmp(b.0));
        checks.into_iter()
    }

    /// Factory default parameters of a check
    pub fn default_params(&self, check_id: &str) -> Option<&Value> {
        self.checks.get(check_id).and_then(|def| def.default_params.as_ref())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut precompiled: Vec<&String> = self.precompilers.keys().collect();
        precompiled.sort();
        f.debug_struct("Registry")
            .field("checks", &self.checks)
            .field("precompilers", &precompiled)
            .finish()
    }
}

impl CheckCatalog for Registry {
    fn exists(&self, check_id: &str) -> bool {
        self.checks.contains_key(check_id)
    }

    fn is_snmp_sourced(&self, check_id: &str) -> bool {
        matches!(self.checks.get(check_id), Some(def) if def.source == CheckSource::Snmp)
    }

    fn is_tcp_sourced(&self, check_id: &str) -> bool {
        matches!(self.checks.get(check_id), Some(def) if def.source == CheckSource::Tcp)
    }

    fn description_template(&self, check_id: &str) -> Option<&str> {
        self.checks.get(check_id).map(|def| def.template.as_str())
    }

    fn precompile_params(
        &self,
        hostname: &str,
        check_id: &str,
        item: Option<&str>,
        params: Value,
    ) -> Value {
        match self.precompilers.get(check_id) {
            Some(precompile) => precompile(hostname, item, &params),
            None => params,
        }
    }
}
