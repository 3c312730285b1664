//! Check table resolution.
//!
//! A resolution runs through these phases:
//!
//! ```text
//! BuildUnsorted → PruneDangling → [cache] → [Dedup] → [Sort] → [Precompile]
//! ```
//!
//! Building expands autochecks, single host rules and multi host rules (in
//! that order, later entries replacing earlier ones with the same key) and,
//! for clusters, the node checks the cluster owns. The unordered table is
//! cached per (hostname, filter mode); duplicate removal and sorting derive
//! new values from it.

pub mod cluster;
pub mod dedup;
pub mod expand;
pub mod options;
pub mod sort;
pub mod validity;

pub use dedup::remove_duplicate_checks;
pub use expand::EntryExpander;
pub use options::{FilterMode, ResolveOptions};
pub use sort::sort_check_table;
pub use validity::CheckValidityFilter;

use std::sync::Arc;

use tracing::debug;

use crate::cache::CheckTableCache;
use crate::collaborators::ResolverContext;
use crate::entry::EntrySource;
use crate::error::{ConfigError, ResolveError};
use crate::host::HostConfig;
use crate::table::{prune_dangling, CheckTable, PrecompiledCheck, SortedCheck};

/// Resolves the check tables of hosts
#[derive(Clone, Copy)]
pub struct CheckTableResolver<'a> {
    ctx: ResolverContext<'a>,
    cache: &'a CheckTableCache,
}

impl<'a> CheckTableResolver<'a> {
    pub fn new(ctx: ResolverContext<'a>, cache: &'a CheckTableCache) -> Self {
        Self { ctx, cache }
    }

    pub fn context(&self) -> ResolverContext<'a> {
        self.ctx
    }

    /// Unordered check table of a host.
    ///
    /// Ping-only hosts never get autochecks. The cache holds only tables
    /// built with autochecks and without ignored services, so it is bypassed
    /// when either option deviates, and it always holds the table before
    /// duplicate removal.
    ///
    /// Duplicates are removed only for dual-source hosts, on fresh builds and
    /// cache hits alike. Other hosts keep every entry, even when a custom
    /// [`CheckCatalog`](crate::CheckCatalog) lets several of their checks
    /// share a description.
    pub fn resolve(
        &self,
        host: &HostConfig,
        options: &ResolveOptions,
    ) -> Result<Arc<CheckTable>, ResolveError> {
        let skip_autochecks = options.skip_autochecks || host.is_ping_host;
        let cacheable = options.use_cache && options.skip_ignored && !skip_autochecks;
        let remove_duplicates = options.remove_duplicates && host.is_dual_source();

        if cacheable {
            if let Some(table) = self.cache.get(&host.hostname, options.filter_mode) {
                debug!(
                    host = %host.hostname,
                    filter = %options.filter_mode,
                    "check table cache hit"
                );
                return Ok(self.finish(table, remove_duplicates));
            }
        }

        let generation = self.cache.generation();
        let mut table = self.build_unsorted(host, skip_autochecks, options)?;
        prune_dangling(&mut table);
        debug!(
            host = %host.hostname,
            filter = %options.filter_mode,
            checks = table.len(),
            "built check table"
        );

        let table = Arc::new(table);
        if cacheable {
            self.cache.insert(generation, &host.hostname, options.filter_mode, table.clone());
        }

        Ok(self.finish(table, remove_duplicates))
    }

    /// Like [`CheckTableResolver::resolve`], looking the host up by name
    pub fn resolve_host(
        &self,
        hostname: &str,
        options: &ResolveOptions,
    ) -> Result<Arc<CheckTable>, ResolveError> {
        self.resolve(self.lookup(hostname)?, options)
    }

    /// Check table ordered by service dependencies.
    ///
    /// Duplicate removal is always requested.
    pub fn resolve_sorted(
        &self,
        host: &HostConfig,
        options: &ResolveOptions,
    ) -> Result<Vec<SortedCheck>, ResolveError> {
        let options = options.clone().with_remove_duplicates(true);
        let table = self.resolve(host, &options)?;
        Ok(sort_check_table(&host.hostname, &table)?)
    }

    /// Like [`CheckTableResolver::resolve_sorted`], looking the host up by name
    pub fn resolve_sorted_host(
        &self,
        hostname: &str,
        options: &ResolveOptions,
    ) -> Result<Vec<SortedCheck>, ResolveError> {
        self.resolve_sorted(self.lookup(hostname)?, options)
    }

    /// Sorted check table with parameters precompiled for execution
    pub fn resolve_precompiled(
        &self,
        host: &HostConfig,
        options: &ResolveOptions,
    ) -> Result<Vec<PrecompiledCheck>, ResolveError> {
        let sorted = self.resolve_sorted(host, options)?;

        Ok(sorted
            .into_iter()
            .map(|check| {
                let params = self.ctx.catalog.precompile_params(
                    &host.hostname,
                    &check.check_id,
                    check.item.as_deref(),
                    check.params,
                );
                PrecompiledCheck {
                    check_id: check.check_id,
                    item: check.item,
                    params,
                    description: check.description,
                }
            })
            .collect())
    }

    fn lookup(&self, hostname: &str) -> Result<&'a HostConfig, ResolveError> {
        self.ctx
            .hosts
            .host_config(hostname)
            .ok_or_else(|| ResolveError::UnknownHost(hostname.to_string()))
    }

    fn finish(&self, table: Arc<CheckTable>, remove_duplicates: bool) -> Arc<CheckTable> {
        if remove_duplicates {
            Arc::new(remove_duplicate_checks(self.ctx.catalog, &table))
        } else {
            table
        }
    }

    fn build_unsorted(
        &self,
        host: &HostConfig,
        skip_autochecks: bool,
        options: &ResolveOptions,
    ) -> Result<CheckTable, ConfigError> {
        let ctx = self.ctx;
        let hostname = host.hostname.as_str();
        let mut expander = EntryExpander::new(ctx, host, options.filter_mode, options.skip_ignored);
        let mut table = CheckTable::new();

        if !skip_autochecks {
            for entry in ctx.entries.autochecks_of(hostname) {
                expander.expand_into(entry.normalize(EntrySource::Autocheck), &mut table)?;
            }
        }

        for entry in ctx.entries.single_host_checks(hostname) {
            expander.expand_into(entry.normalize(EntrySource::SingleHostRule), &mut table)?;
        }

        for entry in ctx.entries.multi_host_checks() {
            expander.expand_into(entry.normalize(EntrySource::MultiHostRule), &mut table)?;
        }

        if host.is_cluster {
            cluster::aggregate_node_checks(ctx, host, skip_autochecks, &mut expander, &mut table)?;
        }

        Ok(table)
    }
}
