use serde_json::json;

use checktable::{
    CheckTableCache, CheckTableKey, CheckTableResolver, CheckTableValue, ConfigError, HostConfig,
    HostPattern, ManagementProtocol, RawEntry, ResolveError, ResolveOptions,
};

use crate::common::World;

fn no_cache() -> ResolveOptions {
    ResolveOptions::new().with_cache(false)
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
fn test_single_host_rule_scenario() {
    let world = World::new().with_host(HostConfig::new("host1")).with_rule(RawEntry::host_rule(
        HostPattern::Single("host1".into()),
        "df",
        Some("/"),
        json!({}),
    ));
    let cache = CheckTableCache::new();
    let resolver = CheckTableResolver::new(world.context(), &cache);

    let table = resolver.resolve(world.host("host1"), &ResolveOptions::new()).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(
        table.get(&CheckTableKey::new("df", Some("/"))),
        Some(&CheckTableValue::new(json!({}), "df /", vec![]))
    );
}

#[test]
fn test_later_entries_replace_earlier_ones() {
    let world = World::new()
        .with_host(HostConfig::new("h1"))
        .with_autocheck("h1", "df", Some("/"), json!({ "from": "autocheck" }))
        .with_rule(RawEntry::host_rule(
            HostPattern::Single("h1".into()),
            "df",
            Some("/"),
            json!({ "from": "single" }),
        ))
        .with_rule(RawEntry::host_rule(
            HostPattern::List(vec!["h1".into(), "h2".into()]),
            "df",
            Some("/"),
            json!({ "from": "multi" }),
        ));
    let cache = CheckTableCache::new();
    let resolver = CheckTableResolver::new(world.context(), &cache);

    let table = resolver.resolve(world.host("h1"), &no_cache()).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table[&CheckTableKey::new("df", Some("/"))].params, json!({ "from": "multi" }));
}

#[test]
fn test_invalid_checks_are_skipped() {
    let world = World::new()
        .with_host(HostConfig::new("agent"))
        .with_host(HostConfig::new("board").with_management(Some(ManagementProtocol::Snmp)))
        .with_host(HostConfig::new("switch").with_agent(false).with_snmp(true))
        .with_rule(RawEntry::host_rule(HostPattern::all(), "snmp_uptime", None, json!(null)))
        .with_rule(RawEntry::host_rule(HostPattern::all(), "cpu", None, json!(null)))
        .with_rule(RawEntry::host_rule(HostPattern::all(), "no_such_check", None, json!(null)));

    assert_eq!(keys(&world, "agent", &no_cache()), vec!["cpu"]);
    assert_eq!(keys(&world, "board", &no_cache()), vec!["snmp_uptime", "cpu"]);
    assert_eq!(keys(&world, "switch", &no_cache()), vec!["snmp_uptime"]);
}

#[test]
fn test_host_lists_and_tags() {
    let world = World::new()
        .with_host(HostConfig::new("web1").with_tags(["lnx", "prod"]))
        .with_host(HostConfig::new("web2").with_tags(["lnx"]))
        .with_host(HostConfig::new("db1").with_tags(["win", "prod"]))
        .with_rule(RawEntry::host_rule(
            HostPattern::List(vec!["!web2".into(), "@all".into()]),
            "cpu",
            None,
            json!(null),
        ))
        .with_rule(RawEntry::tagged_host_rule(
            vec!["lnx".into(), "!prod".into()],
            HostPattern::all(),
            "mem",
            None,
            json!(null),
        ))
        .with_rule(RawEntry::host_rule(
            HostPattern::List(vec!["db1|win".into()]),
            "uptime",
            None,
            json!(null),
        ));

    assert_eq!(keys(&world, "web1", &no_cache()), vec!["cpu"]);
    assert_eq!(keys(&world, "web2", &no_cache()), vec!["mem"]);
    assert_eq!(keys(&world, "db1", &no_cache()), vec!["cpu", "uptime"]);
}

#[test]
fn test_empty_host_list_matches_nothing() {
    let world = World::new()
        .with_host(HostConfig::new("h1"))
        .with_rule(RawEntry::host_rule(HostPattern::List(vec![]), "cpu", None, json!(null)));

    assert!(keys(&world, "h1", &no_cache()).is_empty());
}

#[test]
fn test_ignored_services() {
    let world = World::new()
        .with_host(HostConfig::new("h1"))
        .with_autocheck("h1", "df", Some("/"), json!(null))
        .with_autocheck("h1", "cpu", None, json!(null))
        .with_ignored("df /");

    assert_eq!(keys(&world, "h1", &no_cache()), vec!["cpu"]);
    assert_eq!(keys(&world, "h1", &no_cache().with_skip_ignored(false)), vec!["df//", "cpu"]);
}

#[test]
fn test_ping_host_never_gets_autochecks() {
    let world = World::new()
        .with_host(HostConfig::new("pinger").with_ping(true))
        .with_autocheck("pinger", "cpu", None, json!(null))
        .with_rule(RawEntry::host_rule(
            HostPattern::Single("pinger".into()),
            "mem",
            None,
            json!(null),
        ));
    let cache = CheckTableCache::new();
    let resolver = CheckTableResolver::new(world.context(), &cache);

    let table = resolver.resolve(world.host("pinger"), &ResolveOptions::new()).unwrap();

    assert_eq!(table.keys().map(|key| key.to_string()).collect::<Vec<_>>(), vec!["mem"]);
    assert!(cache.is_empty());
}

#[test]
fn test_dependencies_are_attached_and_pruned() {
    let world = World::new()
        .with_host(HostConfig::new("h1"))
        .with_autocheck("h1", "df", Some("/"), json!(null))
        .with_autocheck("h1", "cpu", None, json!(null))
        .with_dependency("df /", &["CPU load", "Mount /"]);
    let cache = CheckTableCache::new();
    let resolver = CheckTableResolver::new(world.context(), &cache);

    let table = resolver.resolve(world.host("h1"), &no_cache()).unwrap();

    assert_eq!(table[&CheckTableKey::new("df", Some("/"))].dependencies, vec!["CPU load"]);
}

#[test]
fn test_resolve_is_deterministic() {
    let world = World::new()
        .with_host(HostConfig::new("h1").with_snmp(true))
        .with_autocheck("h1", "snmp_df", Some("/"), json!(null))
        .with_autocheck("h1", "df", Some("/"), json!(null))
        .with_autocheck("h1", "cpu", None, json!(null))
        .with_rule(RawEntry::host_rule(
            HostPattern::all(),
            "mem",
            None,
            json!({ "levels": [1, 2] }),
        ));
    let cache = CheckTableCache::new();
    let resolver = CheckTableResolver::new(world.context(), &cache);
    let host = world.host("h1");

    for options in [no_cache(), no_cache().with_remove_duplicates(true)] {
        let first = resolver.resolve(host, &options).unwrap();
        let second = resolver.resolve(host, &options).unwrap();
        assert_eq!(*first, *second);
        assert_eq!(
            first.iter().collect::<Vec<_>>(),
            second.iter().collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_unknown_host() {
    let world = World::new();
    let cache = CheckTableCache::new();
    let resolver = CheckTableResolver::new(world.context(), &cache);

    let err = resolver.resolve_host("ghost", &ResolveOptions::new()).unwrap_err();
    assert!(matches!(err, ResolveError::UnknownHost(ref name) if name == "ghost"));
}

#[test]
fn test_malformed_entries_fail_the_resolution() {
    let world = World::new().with_host(HostConfig::new("h1")).with_rule(RawEntry::tagged_host_rule(
        vec!["!".into()],
        HostPattern::all(),
        "cpu",
        None,
        json!(null),
    ));
    let cache = CheckTableCache::new();
    let resolver = CheckTableResolver::new(world.context(), &cache);

    let err = resolver.resolve(world.host("h1"), &ResolveOptions::new()).unwrap_err();
    assert!(matches!(err, ResolveError::Config(ConfigError::MalformedTag(_))));
    assert!(cache.is_empty());
}
