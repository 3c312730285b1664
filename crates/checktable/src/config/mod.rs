//! Monitoring configuration.
//!
//! A TOML file describes check plugins, hosts with their autodiscovered
//! checks, static check rules and the rule sets consulted while resolving.
//! The loaded [`MonitoringConfig`] implements every resolver collaborator.

mod methods;
mod types;

pub use types::{AutocheckSpec, CheckSpec, ConfigFile, HostSpec, MonitoringConfig, StaticCheck};
