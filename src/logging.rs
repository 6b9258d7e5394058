use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Env var naming a file to log to instead of stderr.
pub const LOG_FILE_ENV: &str = "LAI_LOG";

/// Initialize tracing.
///
/// `RUST_LOG` wins when set; otherwise `level` (from the CLI or the config's
/// `logging.level`) is used. Output goes to stderr so it never mixes with
/// command output on stdout, or to the file named by `LAI_LOG`.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match std::env::var(LOG_FILE_ENV).ok() {
        Some(path) => {
            let Ok(file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
            else {
                eprintln!("Warning: Failed to open log file: {}", path);
                return;
            };
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::sync::Mutex::new(file))
                        .with_ansi(false)
                        .with_timer(UtcTime::rfc_3339())
                        .with_target(true),
                )
                .try_init()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_timer(UtcTime::rfc_3339())
                    .with_target(false),
            )
            .try_init(),
    };

    // Already initialized (tests, repeated calls).
    let _ = result;
}
