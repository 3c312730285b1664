//! Checks a cluster inherits from its nodes.

use tracing::{debug, warn};

use super::expand::EntryExpander;
use crate::collaborators::ResolverContext;
use crate::description::service_description;
use crate::entry::{EntrySource, HostPattern, RawEntry};
use crate::error::ConfigError;
use crate::host::HostConfig;
use crate::table::CheckTable;

/// Add the node checks owned by the cluster to the cluster's table.
///
/// Node entries are reduced to (check, item, params); services are described
/// in the context of the node, and only those whose owner is the cluster are
/// fed through the expander with the cluster as target and cluster specific
/// parameters.
pub fn aggregate_node_checks(
    ctx: ResolverContext<'_>,
    cluster: &HostConfig,
    skip_autochecks: bool,
    expander: &mut EntryExpander<'_>,
    table: &mut CheckTable,
) -> Result<(), ConfigError> {
    if cluster.nodes.is_empty() {
        warn!(cluster = %cluster.hostname, "cluster has no nodes");
        return Ok(());
    }

    for node in &cluster.nodes {
        let node_clusters: &[String] = match ctx.hosts.host_config(node) {
            Some(node_config) => &node_config.part_of_clusters,
            None => &[],
        };

        let autochecks: &[RawEntry] =
            if skip_autochecks { &[] } else { ctx.entries.autochecks_of(node) };

        let mut inherited = 0usize;
        for entry in ctx.entries.single_host_checks(node).iter().chain(autochecks) {
            let (check_id, item) = (entry.check_id(), entry.item());
            let description = service_description(ctx.catalog, node, check_id, item);

            if ctx.ownership.owner_of(node, &description, node_clusters) != cluster.hostname {
                continue;
            }

            let params =
                ctx.parameters.compute_params(&cluster.hostname, check_id, item, entry.params());
            let cluster_entry = RawEntry::host_rule(
                HostPattern::Single(cluster.hostname.clone()),
                check_id,
                item,
                params,
            );
            expander.expand_into(cluster_entry.normalize(EntrySource::ClusterInherited), table)?;
            inherited += 1;
        }

        debug!(cluster = %cluster.hostname, node = %node, inherited, "aggregated node checks");
    }

    Ok(())
}
