use tracing_subscriber::EnvFilter;

/// Filter directive from `-v` flags, falling back to the configured level.
fn directive(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_owned(),
        1 => "info".to_owned(),
        2 => "debug".to_owned(),
        _ => "trace".to_owned(),
    }
}

/// Initialize the global subscriber. `RUST_LOG` takes precedence when set.
/// Logs go to stderr; stdout carries command output only.
pub fn init(verbose: u8, configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(verbose, configured)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_configured_level() {
        assert_eq!(directive(0, "warn"), "warn");
        assert_eq!(directive(1, "warn"), "info");
        assert_eq!(directive(2, "warn"), "debug");
        assert_eq!(directive(5, "warn"), "trace");
    }
}
