//! Tag predicate matching.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const NEGATION: char = '!';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagCondition<'a> {
    Present(&'a str),
    Absent(&'a str),
}

impl<'a> TagCondition<'a> {
    fn parse(raw: &'a str) -> Result<Self, ConfigError> {
        let condition = match raw.strip_prefix(NEGATION) {
            Some(tag) => TagCondition::Absent(tag),
            None => TagCondition::Present(raw),
        };

        match condition {
            TagCondition::Present(tag) | TagCondition::Absent(tag)
                if tag.is_empty() || tag.starts_with(NEGATION) =>
            {
                Err(ConfigError::MalformedTag(raw.to_string()))
            }
            _ => Ok(condition),
        }
    }

    fn holds(self, host_tags: &BTreeSet<String>) -> bool {
        match self {
            TagCondition::Present(tag) => host_tags.contains(tag),
            TagCondition::Absent(tag) => !host_tags.contains(tag),
        }
    }
}

/// Check a host's tags against a rule's tag predicate list.
///
/// An empty predicate matches every host. Every element is parsed before the
/// result is decided, so a malformed element is reported even if an earlier
/// one already failed to match.
pub fn matches<S: AsRef<str>>(
    host_tags: &BTreeSet<String>,
    predicate: &[S],
) -> Result<bool, ConfigError> {
    let mut matched = true;
    for raw in predicate {
        let condition = TagCondition::parse(raw.as_ref())?;
        matched &= condition.holds(host_tags);
    }
    Ok(matched)
}

/// Check that every element of a tag predicate is well-formed
pub fn validate<S: AsRef<str>>(predicate: &[S]) -> Result<(), ConfigError> {
    predicate.iter().try_for_each(|raw| TagCondition::parse(raw.as_ref()).map(|_| ()))
}

/// A validated tag predicate list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TagPredicate(Vec<String>);

impl TagPredicate {
    pub fn new(predicate: Vec<String>) -> Result<Self, ConfigError> {
        validate(&predicate)?;
        Ok(Self(predicate))
    }

    pub fn matches(&self, host_tags: &BTreeSet<String>) -> bool {
        self.0.iter().all(|raw| match TagCondition::parse(raw) {
            Ok(condition) => condition.holds(host_tags),
            Err(_) => false,
        })
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl TryFrom<Vec<String>> for TagPredicate {
    type Error = ConfigError;

    fn try_from(predicate: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(predicate)
    }
}

impl From<TagPredicate> for Vec<String> {
    fn from(predicate: TagPredicate) -> Self {
        predicate.0
    }
}
