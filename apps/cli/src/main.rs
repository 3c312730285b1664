#![warn(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use checktable::{CheckTableCache, FilterMode, MonitoringConfig, ResolveOptions, SortedCheck};

mod output;

/// Resolve the check tables of monitored hosts.
#[derive(Parser)]
#[command(name = "checktable", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// More output per occurrence (warn, info, debug, trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Unordered check table of a host
    Table {
        host: String,
        #[command(flatten)]
        resolve: ResolveArgs,
        /// Drop SNMP checks duplicating agent checks
        #[arg(long)]
        remove_duplicates: bool,
    },
    /// Check table ordered by service dependencies
    Sorted {
        host: String,
        #[command(flatten)]
        resolve: ResolveArgs,
    },
    /// Sorted check table with precompiled parameters
    Precompiled {
        host: String,
        #[command(flatten)]
        resolve: ResolveArgs,
    },
    /// Print a configuration summary
    Config,
}

#[derive(Args)]
struct ResolveArgs {
    /// Build the table without consulting the cache
    #[arg(long)]
    no_cache: bool,

    /// Leave out autodiscovered checks
    #[arg(long)]
    skip_autochecks: bool,

    /// Which services of cluster nodes to include
    #[arg(long, value_enum, default_value_t = Filter::Default)]
    filter: Filter,

    /// Keep services matched by ignore rules
    #[arg(long)]
    keep_ignored: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Filter {
    Default,
    OnlyClustered,
    IncludeClustered,
}

impl From<Filter> for FilterMode {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Default => FilterMode::Default,
            Filter::OnlyClustered => FilterMode::OnlyClustered,
            Filter::IncludeClustered => FilterMode::IncludeClustered,
        }
    }
}

impl ResolveArgs {
    fn options(&self) -> ResolveOptions {
        ResolveOptions::new()
            .with_cache(!self.no_cache)
            .with_skip_autochecks(self.skip_autochecks)
            .with_filter_mode(self.filter.into())
            .with_skip_ignored(!self.keep_ignored)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_with_level(logger::level_from_verbosity(cli.verbose));

    let config =
        MonitoringConfig::from_config(cli.config.as_ref()).with_context(|| match &cli.config {
            Some(path) => format!("loading config from {}", path.display()),
            None => "loading default config".to_string(),
        })?;

    let cache = CheckTableCache::new();
    let resolver = config.resolver(&cache);

    match &cli.command {
        Command::Table { host, resolve, remove_duplicates } => {
            let options = resolve.options().with_remove_duplicates(*remove_duplicates);
            let table = resolver
                .resolve_host(host, &options)
                .with_context(|| format!("resolving check table of {host}"))?;
            debug!(host = %host, checks = table.len(), "resolved check table");

            let rows: Vec<SortedCheck> =
                table.iter().map(|(key, value)| SortedCheck::from_entry(key, value)).collect();
            output::print_json(&rows)
        }
        Command::Sorted { host, resolve } => {
            let sorted = resolver
                .resolve_sorted_host(host, &resolve.options())
                .with_context(|| format!("sorting check table of {host}"))?;
            output::print_json(&sorted)
        }
        Command::Precompiled { host, resolve } => {
            let host_config = config.host(host).with_context(|| format!("unknown host {host}"))?;
            let precompiled = resolver
                .resolve_precompiled(host_config, &resolve.options())
                .with_context(|| format!("precompiling check table of {host}"))?;
            output::print_json(&precompiled)
        }
        Command::Config => {
            print!("{config}");
            Ok(())
        }
    }
}
