use tracing_subscriber::EnvFilter;

/// Pick the log directive: `SOLID_LOG`, then `RUST_LOG`, then `fallback`.
pub fn filter_directive(
    solid_log: Option<String>,
    rust_log: Option<String>,
    fallback: &str,
) -> String {
    solid_log
        .into_iter()
        .chain(rust_log)
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Install the global `tracing` subscriber.
///
/// Logs go to stderr without timestamps or targets so they interleave
/// cleanly with spinner output. An unparsable directive falls back to `warn`.
pub fn init_tracing(fallback: &str) {
    let directive = filter_directive(
        std::env::var("SOLID_LOG").ok(),
        std::env::var("RUST_LOG").ok(),
        fallback,
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (e.g. from tests) is a no-op.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_log_wins() {
        assert_eq!(
            filter_directive(Some("debug".into()), Some("trace".into()), "warn"),
            "debug"
        );
    }

    #[test]
    fn rust_log_then_fallback() {
        assert_eq!(filter_directive(None, Some("info".into()), "warn"), "info");
        assert_eq!(filter_directive(Some(" ".into()), None, "error"), "error");
    }
}
