//! Ordering of a check table by service dependencies.

use std::collections::{BTreeSet, HashSet};

use crate::error::CyclicDependencyError;
use crate::table::{prune_dangling, CheckTable, SortedCheck};

/// Sort a check table so that every service comes after the services it
/// depends on.
///
/// Dependencies on services the table does not contain are dropped first.
/// Entries start out ordered by description; each pass then emits, in
/// order, every entry none of whose dependencies is still waiting. A pass
/// that emits nothing means the remaining entries depend on each other.
pub fn sort_check_table(
    hostname: &str,
    table: &CheckTable,
) -> Result<Vec<SortedCheck>, CyclicDependencyError> {
    let mut table = table.clone();
    prune_dangling(&mut table);

    let mut unsorted: Vec<SortedCheck> =
        table.iter().map(|(key, value)| SortedCheck::from_entry(key, value)).collect();
    unsorted.sort_by(|a, b| a.description.cmp(&b.description));

    let mut ordered = Vec::with_capacity(unsorted.len());
    while !unsorted.is_empty() {
        let waiting: HashSet<String> =
            unsorted.iter().map(|check| check.description.clone()).collect();

        let (ready, left): (Vec<SortedCheck>, Vec<SortedCheck>) = unsorted
            .into_iter()
            .partition(|check| check.dependencies.iter().all(|dep| !waiting.contains(dep)));

        if ready.is_empty() {
            let descriptions: BTreeSet<String> = waiting.into_iter().collect();
            return Err(CyclicDependencyError {
                hostname: hostname.to_string(),
                descriptions: descriptions.into_iter().collect(),
            });
        }

        ordered.extend(ready);
        unsorted = left;
    }

    Ok(ordered)
}
