use std::fs;

use checktable::{CheckTableCache, ConfigError, MonitoringConfig, ResolveOptions};

const CONFIG: &str = r#"
[[checks]]
name = "df"
template = "Filesystem %s"
source = "tcp"
default_params = { levels = [80.0, 90.0] }

[[checks]]
name = "hr_fs"
template = "Filesystem %s"
source = "snmp"

[[hosts]]
name = "srv1"
tags = ["lnx", "prod"]
snmp = true
autochecks = [
    { check = "df", item = "/" },
    { check = "hr_fs", item = "/" },
]

[[static_checks]]
hosts = ["@all"]
check = "df"
item = "/var"

[rules]
ignored_checktypes = ["ntp"]

[[rules.service_dependencies]]
service = "Filesystem /var"
depends_on = ["Filesystem /"]
"#;

#[test]
fn test_missing_file_is_created_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/checktable");

    let config = MonitoringConfig::from_config(Some(&path)).unwrap();

    assert!(config.registry().is_empty());
    assert_eq!(config.hosts().count(), 0);
    let written = dir.path().join("nested/checktable.toml");
    assert!(written.exists());

    // the written default loads again
    let reloaded = MonitoringConfig::from_config(Some(&written)).unwrap();
    assert_eq!(reloaded.file(), config.file());
}

#[test]
fn test_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, CONFIG).unwrap();

    let config = MonitoringConfig::from_config(Some(&path)).unwrap();
    assert_eq!(config.registry().len(), 2);
    assert!(config.host("srv1").unwrap().is_dual_source());

    let copy = dir.path().join("copy.toml");
    config.write_config(&copy).unwrap();
    let reloaded = MonitoringConfig::from_config(Some(&copy)).unwrap();

    assert_eq!(reloaded.file(), config.file());
    assert_eq!(reloaded.to_string(), config.to_string());
}

#[test]
fn test_toml_extension_is_enforced() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("monitoring.toml"), CONFIG).unwrap();

    let config = MonitoringConfig::from_config(Some(dir.path().join("monitoring.conf"))).unwrap();
    assert_eq!(config.registry().len(), 2);
}

#[test]
fn test_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[[hosts]]\nname = 5\n").unwrap();

    let err = MonitoringConfig::from_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::ParseFailed(_)));

    let err = MonitoringConfig::parse(
        "[[rules.ignored_services]]\nservices = [\"Filesystem (\"]\n",
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::ParseFailed(_)));
    assert!(err.to_string().contains("Filesystem ("));
}

#[test]
fn test_config_deserializes_through_serde() {
    let config: MonitoringConfig = toml::from_str(CONFIG).unwrap();
    assert_eq!(config.host("srv1").unwrap().tags.len(), 2);

    let err = toml::from_str::<MonitoringConfig>("[[hosts]]\nname = \"c\"\nnodes = [\"n\"]\n")
        .unwrap_err();
    assert!(err.to_string().contains("unknown node n"));
}

const WINDOWS_HOSTS: &str = r#"
[[checks]]
name = "df"
template = "Filesystem %s"
source = "tcp"

[[hosts]]
name = "winbox"
tags = ["win"]

[[hosts]]
name = "other"
"#;

fn with_static_check(static_check: &str) -> String {
    format!("{WINDOWS_HOSTS}\n[[static_checks]]\n{static_check}\n")
}

#[test]
fn test_table_static_check_tags_must_be_a_list() {
    let raw = with_static_check("tags = \"lnx\"\nhosts = [\"@all\"]\ncheck = \"df\"\nitem = \"/\"");
    let err = MonitoringConfig::parse(&raw).unwrap_err();
    assert!(matches!(err, ConfigError::TagPredicateNotList));

    let raw = with_static_check("tags = [\"!\"]\nhosts = [\"@all\"]\ncheck = \"df\"\nitem = \"/\"");
    let err = MonitoringConfig::parse(&raw).unwrap_err();
    assert!(matches!(err, ConfigError::MalformedTag(_)));
}

#[test]
fn test_table_static_check_requires_hosts() {
    let raw = with_static_check("tags = [\"lnx\"]\ncheck = \"df\"\nitem = \"/\"");
    let err = MonitoringConfig::parse(&raw).unwrap_err();
    assert!(matches!(err, ConfigError::MissingHostPattern));

    let raw = with_static_check("check = \"df\"\nitem = \"/\"");
    let err = MonitoringConfig::parse(&raw).unwrap_err();
    assert!(matches!(err, ConfigError::MissingHostPattern));
}

#[test]
fn test_table_static_check_rejects_unknown_fields() {
    let raw = with_static_check("tag = [\"lnx\"]\nhosts = [\"@all\"]\ncheck = \"df\"");
    let err = MonitoringConfig::parse(&raw).unwrap_err();
    assert!(matches!(err, ConfigError::ParseFailed(_)));
}

#[test]
fn test_table_static_check_tags_restrict_hosts() {
    let raw =
        with_static_check("tags = [\"lnx\"]\nhosts = [\"@all\"]\ncheck = \"df\"\nitem = \"/\"");
    let config = MonitoringConfig::parse(&raw).unwrap();
    let cache = CheckTableCache::new();
    let resolver = config.resolver(&cache);

    for hostname in ["winbox", "other"] {
        let table = resolver.resolve_host(hostname, &ResolveOptions::new()).unwrap();
        assert!(table.is_empty(), "{hostname} got {:?}", table.keys().collect::<Vec<_>>());
    }
}
