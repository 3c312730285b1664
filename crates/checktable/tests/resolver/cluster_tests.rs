use serde_json::json;

use checktable::{
    CheckTableCache, CheckTableKey, CheckTableResolver, FilterMode, HostConfig, HostPattern,
    RawEntry, ResolveOptions,
};

use crate::common::World;

fn cluster_world() -> World {
    World::new()
        .with_host(HostConfig::new("n1").with_part_of_clusters(vec!["clu".into()]))
        .with_host(HostConfig::new("n2").with_part_of_clusters(vec!["clu".into()]))
        .with_host(HostConfig::new("clu").with_nodes(vec!["n1".into(), "n2".into()]))
        .with_autocheck("n1", "df", Some("/"), json!({ "levels": [80, 90] }))
        .with_autocheck("n1", "cpu", None, json!(null))
        .with_rule(RawEntry::host_rule(HostPattern::Single("n2".into()), "mem", None, json!(null)))
        .with_clustered("df /", "clu")
        .with_clustered("Memory", "clu")
        .with_marked_params()
}

fn keys(world: &World, hostname: &str, options: &ResolveOptions) -> Vec<String> {
    let cache = CheckTableCache::new();
    let resolver = CheckTableResolver::new(world.context(), &cache);
    resolver
        .resolve(world.host(hostname), options)
        .unwrap()
        .keys()
        .map(|key| key.to_string())
        .collect()
}

#[test]
fn test_clustered_service_moves_to_cluster() {
    let world = cluster_world();
    let cache = CheckTableCache::new();
    let resolver = CheckTableResolver::new(world.context(), &cache);

    let table = resolver.resolve(world.host("clu"), &ResolveOptions::new()).unwrap();

    assert_eq!(table.keys().map(|key| key.to_string()).collect::<Vec<_>>(), vec!["df//", "mem"]);
    let df = &table[&CheckTableKey::new("df", Some("/"))];
    assert_eq!(df.description, "df /");
    assert_eq!(df.params, json!({ "computed_for": "clu", "raw": { "levels": [80, 90] } }));
}

#[test]
fn test_node_filter_modes() {
    let world = cluster_world();
    let options = ResolveOptions::new();

    assert_eq!(keys(&world, "n1", &options), vec!["cpu"]);
    assert_eq!(
        keys(&world, "n1", &options.clone().with_filter_mode(FilterMode::OnlyClustered)),
        vec!["df//"]
    );
    assert_eq!(
        keys(&world, "n1", &options.clone().with_filter_mode(FilterMode::IncludeClustered)),
        vec!["df//", "cpu"]
    );
}

#[test]
fn test_skip_autochecks_keeps_node_rules() {
    let world = cluster_world();
    let options = ResolveOptions::new().with_skip_autochecks(true);

    assert_eq!(keys(&world, "clu", &options), vec!["mem"]);
}

#[test]
fn test_node_without_configuration_keeps_its_services() {
    let world = World::new()
        .with_host(HostConfig::new("clu").with_nodes(vec!["ghost".into()]))
        .with_autocheck("ghost", "df", Some("/"), json!(null))
        .with_clustered("df /", "clu");

    assert!(keys(&world, "clu", &ResolveOptions::new()).is_empty());
}

#[test]
fn test_cluster_without_nodes() {
    let world = World::new().with_host(HostConfig::new("clu").with_nodes(vec![]));

    assert!(keys(&world, "clu", &ResolveOptions::new()).is_empty());
}

#[test]
fn test_cluster_entry_replaces_own_entry() {
    let world = cluster_world().with_rule(RawEntry::host_rule(
        HostPattern::Single("clu".into()),
        "df",
        Some("/"),
        json!({ "own": true }),
    ));
    let cache = CheckTableCache::new();
    let resolver = CheckTableResolver::new(world.context(), &cache);

    let table = resolver.resolve(world.host("clu"), &ResolveOptions::new()).unwrap();

    assert_eq!(
        table[&CheckTableKey::new("df", Some("/"))].params["computed_for"],
        json!("clu")
    );
}
