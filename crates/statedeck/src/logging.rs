use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `-v` raises the level to debug and `-vv`
/// to trace; `-q` keeps only errors. Without flags `RUST_LOG` is honoured,
/// falling back to `warn` so a running presentation stays quiet.
pub fn init(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("debug"),
        (false, _) => Some("trace"),
    };

    let filter = match level {
        Some(level) => EnvFilter::new(format!("statedeck={level},warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
