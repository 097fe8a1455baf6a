//! Shared logging utilities for consistent tracing setup

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber for the optimizer binary and tests.
///
/// `log_level` applies to the workspace crates; noisy HTTP client internals
/// are pinned to warn.
pub fn init_tracing(log_level: Option<&str>) {
    let base_level = log_level.unwrap_or("info");
    let filter = format!("optimizer={base_level},shared={base_level},reqwest=warn");

    fmt()
        .with_env_filter(EnvFilter::new(&filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
