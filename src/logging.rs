use tracing_subscriber::{fmt, EnvFilter};

/// Picks the filter directive from the command-line flags, falling back to the configured level.
pub fn filter_directive(verbose: u8, quiet: bool, config_level: &str) -> String {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => config_level,
            1 => "info",
            _ => "debug",
        }
    };
    level.to_string()
}

pub fn init_logging(verbose: u8, quiet: bool, config_level: &str) {
    let directive = filter_directive(verbose, quiet, config_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    // A subscriber may already be installed when running under tests.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
