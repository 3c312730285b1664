//! Logging setup shared by the checktable binaries.

mod subscriber;

pub use subscriber::{LogFormat, init, init_with_level, level_from_verbosity};
pub use tracing::level_filters::LevelFilter;
