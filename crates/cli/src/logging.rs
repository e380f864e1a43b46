//! Tracing setup for the CLI binary.

use tracing_subscriber::EnvFilter;

/// `-v` raises the default filter to `debug`; the config file's `trace` flag
/// (or a second `-v`) raises it to `trace`. `RUST_LOG` always wins when set.
pub fn init(verbose: u8, trace: bool) {
    let default_directive = if trace || verbose >= 2 {
        "scripty=trace"
    } else if verbose == 1 {
        "scripty=debug"
    } else {
        "scripty=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)))
        .with_writer(std::io::stderr)
        .init();
}
