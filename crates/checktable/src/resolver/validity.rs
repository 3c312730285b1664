//! Check plugin validity per host.

use std::collections::HashMap;

use crate::collaborators::CheckCatalog;
use crate::host::HostConfig;

/// Decides whether a check may run on one host, memoized per check.
///
/// One filter per host and resolution.
pub struct CheckValidityFilter<'a> {
    catalog: &'a dyn CheckCatalog,
    host: &'a HostConfig,
    memo: HashMap<String, bool>,
}

impl<'a> CheckValidityFilter<'a> {
    pub fn new(catalog: &'a dyn CheckCatalog, host: &'a HostConfig) -> Self {
        Self { catalog, host, memo: HashMap::new() }
    }

    pub fn is_valid(&mut self, check_id: &str) -> bool {
        if let Some(&passed) = self.memo.get(check_id) {
            return passed;
        }

        let passed = self.evaluate(check_id);
        self.memo.insert(check_id.to_string(), passed);
        passed
    }

    fn evaluate(&self, check_id: &str) -> bool {
        if !self.catalog.exists(check_id) {
            return false;
        }

        // SNMP checks on hosts that are no longer SNMP hosts may still be
        // around from an earlier discovery. Same for agent based checks.
        if self.catalog.is_snmp_sourced(check_id) && !self.host.accepts_snmp_checks() {
            return false;
        }

        if self.catalog.is_tcp_sourced(check_id) && !self.host.is_agent_host {
            return false;
        }

        true
    }
}
