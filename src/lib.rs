pub mod ai;
pub mod commands;
pub mod render;
pub mod weight_class;

use tracing_subscriber::EnvFilter;

/// Load `.env` and install the log subscriber
///
/// Logs go to stderr; stdout is reserved for the report.
pub fn init() {
    // Load .env file - try multiple locations
    // Running from the repo root is the common case; check current dir first
    if dotenvy::dotenv().is_err() {
        // Fallback: check parent directory (if running from a subdirectory)
        let _ = dotenvy::from_path("../.env");
    }

    // Initialize tracing with RUST_LOG env filter
    // Default: warn for most crates, info for our app (request summaries visible)
    // Use RUST_LOG=debug for verbose per-request logs
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,fight_analyzer=info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
