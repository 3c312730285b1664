//! Resolution options.

use serde::{Deserialize, Serialize};

/// Which services a host's table contains with respect to cluster ownership
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Only services this host owns
    #[default]
    Default,
    /// Only services owned by one of the host's clusters
    OnlyClustered,
    /// Everything, regardless of ownership
    IncludeClustered,
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::Default => write!(f, "default"),
            FilterMode::OnlyClustered => write!(f, "only_clustered"),
            FilterMode::IncludeClustered => write!(f, "include_clustered"),
        }
    }
}

/// Options of a single resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Drop SNMP checks shadowed by agent checks with the same description
    pub remove_duplicates: bool,

    /// Read from and store into the check table cache
    pub use_cache: bool,

    /// Leave out autodiscovered checks
    pub skip_autochecks: bool,

    /// Cluster ownership filter
    pub filter_mode: FilterMode,

    /// Leave out services matched by ignore rules; tables keeping them are
    /// never cached
    pub skip_ignored: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            remove_duplicates: false,
            use_cache: true,
            skip_autochecks: false,
            filter_mode: FilterMode::Default,
            skip_ignored: true,
        }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable duplicate removal
    pub fn with_remove_duplicates(mut self, enable: bool) -> Self {
        self.remove_duplicates = enable;
        self
    }

    /// Enable or disable the check table cache
    pub fn with_cache(mut self, enable: bool) -> Self {
        self.use_cache = enable;
        self
    }

    /// Skip or include autochecks
    pub fn with_skip_autochecks(mut self, skip: bool) -> Self {
        self.skip_autochecks = skip;
        self
    }

    /// Set the cluster ownership filter
    pub fn with_filter_mode(mut self, filter_mode: FilterMode) -> Self {
        self.filter_mode = filter_mode;
        self
    }

    /// Skip or include ignored services
    pub fn with_skip_ignored(mut self, skip: bool) -> Self {
        self.skip_ignored = skip;
        self
    }
}
