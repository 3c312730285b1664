//! Host matching for rule entries.
//!
//! Rules select hosts by tags and by host lists. Both come in two flavours:
//! free functions over raw configuration strings that fail on malformed
//! input, and validated wrappers ([`TagPredicate`], [`HostList`]) whose
//! matching cannot fail.

pub mod hostlist;
pub mod tags;

pub use hostlist::{HostList, HostPattern, ALL_HOSTS};
pub use tags::TagPredicate;
