//! Logger setup shared by the command line tools.

use env_logger::{Builder, Env};

/// Initialize `env_logger`. `RUST_LOG` wins over the default level, which is
/// `info`, or `trace` when verbose instruction tracing is requested.
pub fn init(verbose: bool) {
    let default_level = if verbose { "trace" } else { "info" };
    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
