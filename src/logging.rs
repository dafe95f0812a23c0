use tracing_subscriber::EnvFilter;

/// Default filter for a given `-v` count, used when `RUST_LOG` is unset.
pub fn default_filter(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "warn,fcc_builder=info",
        _ => "warn,fcc_builder=debug",
    }
}

/// Diagnostic logging on stderr, so stdout stays clean for `--output-format json`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging_stderr(verbose: u8, quiet: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
