//! Applicability of check entries to one host.

use tracing::trace;

use super::options::FilterMode;
use super::validity::CheckValidityFilter;
use crate::collaborators::ResolverContext;
use crate::description::service_description;
use crate::entry::CanonicalEntry;
use crate::error::ConfigError;
use crate::host::HostConfig;
use crate::matching::{hostlist, tags};
use crate::table::{CheckTable, CheckTableKey, CheckTableValue};

/// Expands entries into check table rows for one host
pub struct EntryExpander<'a> {
    ctx: ResolverContext<'a>,
    host: &'a HostConfig,
    filter_mode: FilterMode,
    skip_ignored: bool,
    validity: CheckValidityFilter<'a>,
}

impl<'a> EntryExpander<'a> {
    pub fn new(
        ctx: ResolverContext<'a>,
        host: &'a HostConfig,
        filter_mode: FilterMode,
        skip_ignored: bool,
    ) -> Self {
        Self {
            ctx,
            host,
            filter_mode,
            skip_ignored,
            validity: CheckValidityFilter::new(ctx.catalog, host),
        }
    }

    /// Expand an entry and insert the result, replacing a row with the
    /// same key
    pub fn expand_into(
        &mut self,
        entry: CanonicalEntry<'_>,
        table: &mut CheckTable,
    ) -> Result<(), ConfigError> {
        if let Some((key, value)) = self.expand(entry)? {
            table.insert(key, value);
        }
        Ok(())
    }

    /// Expand a single entry into a check table row, or `None` when the
    /// entry does not apply to this host
    pub fn expand(
        &mut self,
        entry: CanonicalEntry<'_>,
    ) -> Result<Option<(CheckTableKey, CheckTableValue)>, ConfigError> {
        let hostname = self.host.hostname.as_str();

        // autochecks always belong to the host they were discovered on
        if let Some(pattern) = entry.hosts {
            if !hostlist::matches(hostname, pattern)? {
                return Ok(None);
            }
        }

        if !tags::matches(&self.host.tags, entry.tags)? {
            return Ok(None);
        }

        if !self.validity.is_valid(entry.check_id) {
            trace!(host = hostname, check = entry.check_id, "skipping invalid check");
            return Ok(None);
        }

        let description =
            service_description(self.ctx.catalog, hostname, entry.check_id, entry.item);

        if self.skip_ignored
            && self.ctx.ignored.is_ignored(hostname, entry.check_id, &description)
        {
            trace!(host = hostname, service = %description, "skipping ignored service");
            return Ok(None);
        }

        if !self.passes_ownership_filter(&description) {
            return Ok(None);
        }

        let dependencies = self.ctx.dependencies.dependencies_of(hostname, &description);
        trace!(
            host = hostname,
            service = %description,
            source = %entry.source,
            "adding check"
        );

        Ok(Some((
            CheckTableKey::new(entry.check_id, entry.item),
            CheckTableValue::new(entry.params.clone(), description, dependencies),
        )))
    }

    fn passes_ownership_filter(&self, description: &str) -> bool {
        let hostname = self.host.hostname.as_str();
        let is_mine = self.host.part_of_clusters.is_empty()
            || self.ctx.ownership.owner_of(hostname, description, &self.host.part_of_clusters)
                == hostname;

        match self.filter_mode {
            FilterMode::Default => is_mine,
            FilterMode::OnlyClustered => !is_mine,
            FilterMode::IncludeClustered => true,
        }
    }
}
