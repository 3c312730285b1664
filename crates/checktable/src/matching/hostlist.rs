//! Host list matching.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Host list entry matching every host
pub const ALL_HOSTS: &str = "@all";

/// Host selection of a rule entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostPattern {
    /// Exactly one host
    Single(String),
    /// Host names, `!name` negated, `@all` for every host
    List(Vec<String>),
}

impl HostPattern {
    /// Pattern matching every host
    pub fn all() -> Self {
        HostPattern::List(vec![ALL_HOSTS.to_string()])
    }

    /// The host name of a single host pattern
    pub fn single_host(&self) -> Option<&str> {
        match self {
            HostPattern::Single(name) => Some(strip_tags(name)),
            HostPattern::List(_) => None,
        }
    }
}

/// Remove legacy tags from a host list entry (`name|tag1|tag2`)
pub fn strip_tags(entry: &str) -> &str {
    entry.split_once('|').map_or(entry, |(name, _tags)| name)
}

/// Check whether a rule's host pattern selects the host.
pub fn matches(hostname: &str, pattern: &HostPattern) -> Result<bool, ConfigError> {
    match pattern {
        // optimize most common case: one explicit host name
        HostPattern::Single(name) => Ok(strip_tags(name) == hostname),
        HostPattern::List(list) => in_host_list(hostname, list),
    }
}

/// Evaluate a host list: the first entry naming the host decides.
pub fn in_host_list<S: AsRef<str>>(hostname: &str, list: &[S]) -> Result<bool, ConfigError> {
    validate(list)?;

    for raw in list {
        let entry = strip_tags(raw.as_ref());
        if entry == ALL_HOSTS {
            return Ok(true);
        }

        let (negate, name) = match entry.strip_prefix('!') {
            Some(name) => (true, name),
            None => (false, entry),
        };
        if name == hostname {
            return Ok(!negate);
        }
    }

    Ok(false)
}

/// Reject empty host names in a host list
pub fn validate<S: AsRef<str>>(list: &[S]) -> Result<(), ConfigError> {
    let malformed = list.iter().any(|raw| {
        let entry = strip_tags(raw.as_ref());
        entry.is_empty() || entry == "!"
    });

    if malformed {
        return Err(ConfigError::EmptyHostname(
            list.iter().map(|raw| raw.as_ref().to_string()).collect(),
        ));
    }
    Ok(())
}

/// A validated host list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct HostList(Vec<String>);

impl HostList {
    pub fn new(list: Vec<String>) -> Result<Self, ConfigError> {
        validate(&list)?;
        Ok(Self(list))
    }

    /// Host list matching every host
    pub fn all() -> Self {
        Self(vec![ALL_HOSTS.to_string()])
    }

    pub fn matches(&self, hostname: &str) -> bool {
        in_host_list(hostname, &self.0).unwrap_or(false)
    }
}

impl Default for HostList {
    fn default() -> Self {
        Self::all()
    }
}

impl TryFrom<Vec<String>> for HostList {
    type Error = ConfigError;

    fn try_from(list: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(list)
    }
}

impl From<HostList> for Vec<String> {
    fn from(list: HostList) -> Self {
        list.0
    }
}
