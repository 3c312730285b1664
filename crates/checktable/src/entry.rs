//! Check entries and their normalization.
//!
//! Entries arrive in three shapes: autodiscovered checks (check, item,
//! params), host rules (hosts, check, item, params) and tagged host rules
//! (tags, hosts, check, item, params). The positional form used by older
//! configuration files is accepted through [`RawEntry::try_from`], the table
//! form through [`EntryTable`]. Both apply the same field checks.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::matching::tags::validate as validate_tags;
pub use crate::matching::HostPattern;

/// Where an entry was configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntrySource {
    Autocheck,
    SingleHostRule,
    MultiHostRule,
    ClusterInherited,
}

impl std::fmt::Display for EntrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntrySource::Autocheck => write!(f, "autocheck"),
            EntrySource::SingleHostRule => write!(f, "single-host rule"),
            EntrySource::MultiHostRule => write!(f, "multi-host rule"),
            EntrySource::ClusterInherited => write!(f, "cluster-inherited"),
        }
    }
}

/// A check entry as configured.
///
/// Deserializes from the table form, see [`EntryTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawEntry {
    TaggedHostRule {
        tags: Vec<String>,
        hosts: HostPattern,
        check: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<String>,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        params: Value,
    },
    HostRule {
        hosts: HostPattern,
        check: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<String>,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        params: Value,
    },
    Autocheck {
        check: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<String>,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        params: Value,
    },
}

impl RawEntry {
    pub fn autocheck(check: impl Into<String>, item: Option<&str>, params: Value) -> Self {
        RawEntry::Autocheck { check: check.into(), item: item.map(str::to_string), params }
    }

    pub fn host_rule(
        hosts: HostPattern,
        check: impl Into<String>,
        item: Option<&str>,
        params: Value,
    ) -> Self {
        RawEntry::HostRule { hosts, check: check.into(), item: item.map(str::to_string), params }
    }

    pub fn tagged_host_rule(
        tags: Vec<String>,
        hosts: HostPattern,
        check: impl Into<String>,
        item: Option<&str>,
        params: Value,
    ) -> Self {
        RawEntry::TaggedHostRule {
            tags,
            hosts,
            check: check.into(),
            item: item.map(str::to_string),
            params,
        }
    }

    pub fn check_id(&self) -> &str {
        match self {
            RawEntry::Autocheck { check, .. }
            | RawEntry::HostRule { check, .. }
            | RawEntry::TaggedHostRule { check, .. } => check,
        }
    }

    pub fn item(&self) -> Option<&str> {
        match self {
            RawEntry::Autocheck { item, .. }
            | RawEntry::HostRule { item, .. }
            | RawEntry::TaggedHostRule { item, .. } => item.as_deref(),
        }
    }

    pub fn params(&self) -> &Value {
        match self {
            RawEntry::Autocheck { params, .. }
            | RawEntry::HostRule { params, .. }
            | RawEntry::TaggedHostRule { params, .. } => params,
        }
    }

    /// Whether the entry carries a host pattern
    pub fn is_rule(&self) -> bool {
        !matches!(self, RawEntry::Autocheck { .. })
    }

    /// Host name of a host rule that targets exactly one host
    pub fn single_host(&self) -> Option<&str> {
        match self {
            RawEntry::HostRule { hosts, .. } => hosts.single_host(),
            _ => None,
        }
    }

    /// Bring the entry into canonical form.
    ///
    /// `source` is recorded for rule entries; autochecks are always
    /// [`EntrySource::Autocheck`].
    pub fn normalize(&self, source: EntrySource) -> CanonicalEntry<'_> {
        match self {
            RawEntry::Autocheck { check, item, params } => CanonicalEntry {
                source: EntrySource::Autocheck,
                tags: &[],
                hosts: None,
                check_id: check,
                item: item.as_deref(),
                params,
            },
            RawEntry::HostRule { hosts, check, item, params } => CanonicalEntry {
                source,
                tags: &[],
                hosts: Some(hosts),
                check_id: check,
                item: item.as_deref(),
                params,
            },
            RawEntry::TaggedHostRule { tags, hosts, check, item, params } => CanonicalEntry {
                source,
                tags,
                hosts: Some(hosts),
                check_id: check,
                item: item.as_deref(),
                params,
            },
        }
    }
}

/// Parse the positional form `[check, item, params]`,
/// `[hosts, check, item, params]` or `[tags, hosts, check, item, params]`.
impl TryFrom<&Value> for RawEntry {
    type Error = ConfigError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let fields = value.as_array().ok_or(ConfigError::EntryNotList)?;

        match fields.as_slice() {
            [check, item, params] => Ok(RawEntry::Autocheck {
                check: parse_check_id(check)?,
                item: parse_item(item)?,
                params: params.clone(),
            }),
            [hosts, check, item, params] => Ok(RawEntry::HostRule {
                hosts: parse_host_pattern(hosts)?,
                check: parse_check_id(check)?,
                item: parse_item(item)?,
                params: params.clone(),
            }),
            [tags, hosts, check, item, params] => Ok(RawEntry::TaggedHostRule {
                tags: parse_tags(tags)?,
                hosts: parse_host_pattern(hosts)?,
                check: parse_check_id(check)?,
                item: parse_item(item)?,
                params: params.clone(),
            }),
            other => Err(ConfigError::InvalidEntryLength(other.len())),
        }
    }
}

/// Table form of an entry with its fields not yet checked.
///
/// Unknown fields are rejected. The shape follows from the fields present:
/// `tags` and `hosts` make a tagged host rule, `hosts` alone a host rule and
/// neither an autocheck.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Value>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

impl TryFrom<&EntryTable> for RawEntry {
    type Error = ConfigError;

    fn try_from(table: &EntryTable) -> Result<Self, Self::Error> {
        let check = parse_check_id(table.check.as_ref().ok_or(ConfigError::MissingCheckId)?)?;
        let item = table.item.as_ref().map(parse_item).transpose()?.flatten();
        let params = table.params.clone();

        match (&table.tags, &table.hosts) {
            (Some(tags), Some(hosts)) => Ok(RawEntry::TaggedHostRule {
                tags: parse_tags(tags)?,
                hosts: parse_host_pattern(hosts)?,
                check,
                item,
                params,
            }),
            (None, Some(hosts)) => {
                Ok(RawEntry::HostRule { hosts: parse_host_pattern(hosts)?, check, item, params })
            }
            (Some(_), None) => Err(ConfigError::MissingHostPattern),
            (None, None) => Ok(RawEntry::Autocheck { check, item, params }),
        }
    }
}

impl<'de> Deserialize<'de> for RawEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let table = EntryTable::deserialize(deserializer)?;
        RawEntry::try_from(&table).map_err(serde::de::Error::custom)
    }
}

fn parse_check_id(value: &Value) -> Result<String, ConfigError> {
    value.as_str().map(str::to_string).ok_or(ConfigError::CheckIdNotString)
}

fn parse_item(value: &Value) -> Result<Option<String>, ConfigError> {
    match value {
        Value::Null => Ok(None),
        Value::String(item) => Ok(Some(item.clone())),
        _ => Err(ConfigError::ItemNotString),
    }
}

fn parse_tags(value: &Value) -> Result<Vec<String>, ConfigError> {
    let tags = value.as_array().ok_or(ConfigError::TagPredicateNotList)?;
    let tags = tags
        .iter()
        .map(|tag| {
            tag.as_str()
                .map(str::to_string)
                .ok_or_else(|| ConfigError::MalformedTag(tag.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    validate_tags(&tags)?;
    Ok(tags)
}

fn parse_host_pattern(value: &Value) -> Result<HostPattern, ConfigError> {
    match value {
        Value::String(name) if !name.is_empty() => Ok(HostPattern::Single(name.clone())),
        Value::Array(names) => names
            .iter()
            .map(|name| name.as_str().map(str::to_string).ok_or(ConfigError::MalformedHostPattern))
            .collect::<Result<Vec<_>, _>>()
            .map(HostPattern::List),
        _ => Err(ConfigError::MalformedHostPattern),
    }
}

/// Canonical view of an entry, borrowing from the configured entry.
///
/// `hosts` is `None` for autochecks, which always belong to the host they
/// were discovered on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalEntry<'a> {
    pub source: EntrySource,
    pub tags: &'a [String],
    pub hosts: Option<&'a HostPattern>,
    pub check_id: &'a str,
    pub item: Option<&'a str>,
    pub params: &'a Value,
}
