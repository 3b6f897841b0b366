use std::fs::OpenOptions;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILTER_ENV: &str = "EDUADMIN_LOG";
pub const LOG_FILE_ENV: &str = "EDUADMIN_LOG_FILE";

/// Install the global subscriber.
///
/// Logs go to stderr, filtered by `EDUADMIN_LOG` (default `warn` so banners stay readable).
/// When `EDUADMIN_LOG_FILE` is set, a debug-level copy is appended to that file as well.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    let registry = tracing_subscriber::registry().with(stderr_layer);

    let file = std::env::var(LOG_FILE_ENV).ok().and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some((path, file)),
            Err(e) => {
                eprintln!("Could not open log file {}: {}", path, e);
                None
            }
        }
    });

    if let Some((path, file)) = file {
        let file_layer = fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);

        // A second init (tests, embedding) is not an error worth surfacing.
        let _ = registry.with(file_layer).try_init();
        tracing::debug!("file logging enabled: {}", path);
    } else {
        let _ = registry.try_init();
    }
}
