use std::env::var;

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log layer, chosen by `RUST_LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        let value = var("RUST_LOG_FORMAT")
            .inspect_err(|error| {
                warn!("Failed to read RUST_LOG_FORMAT, falling back to compact: {error}")
            })
            .unwrap_or_default();
        Self::parse(&value)
    }

    /// Anything other than `json` is compact
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") { Self::Json } else { Self::Compact }
    }
}

/// Initialize logging at INFO unless `RUST_LOG` says otherwise
pub fn init() {
    init_with_level(LevelFilter::INFO);
}

/// Initialize logging with `level` as default directive.
///
/// `RUST_LOG` directives take precedence. Logs always go to stderr, stdout
/// carries the check tables.
pub fn init_with_level(level: LevelFilter) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_layer = match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed(),
    };

    if let Err(error) = tracing_subscriber::registry().with(log_layer).try_init() {
        eprintln!("logging already initialized: {error}");
    }
}

/// Map a repeated `-v` count to a level: WARN, INFO, DEBUG, then TRACE
pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
