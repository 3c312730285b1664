//! Removal of SNMP checks shadowed by agent checks.
//!
//! Hosts monitored by agent and SNMP often discover the same thing twice,
//! e.g. `df` and `hr_fs` both producing "Filesystem /". The agent check wins,
//! no matter which of the two comes first in the table.

use std::collections::{HashMap, HashSet};

use crate::collaborators::CheckCatalog;
use crate::table::{CheckTable, CheckTableKey};

/// Drop SNMP based checks whose description also has an agent based check.
///
/// Everything that is not SNMP sourced counts as agent based.
pub fn remove_duplicate_checks(catalog: &dyn CheckCatalog, table: &CheckTable) -> CheckTable {
    let mut have_with_tcp: HashSet<&str> = HashSet::new();
    let mut have_with_snmp: HashMap<&str, Vec<&CheckTableKey>> = HashMap::new();
    let mut without_duplicates = CheckTable::with_capacity(table.len());

    for (key, value) in table {
        let description = value.description.as_str();

        if catalog.is_snmp_sourced(&key.check_id) {
            if have_with_tcp.contains(description) {
                continue;
            }
            have_with_snmp.entry(description).or_default().push(key);
        } else {
            if let Some(snmp_keys) = have_with_snmp.remove(description) {
                for snmp_key in snmp_keys {
                    without_duplicates.shift_remove(snmp_key);
                }
            }
            have_with_tcp.insert(description);
        }

        without_duplicates.insert(key.clone(), value.clone());
    }

    without_duplicates
}
