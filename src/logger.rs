// codegen-preview: Structured logging via tracing

use crate::tui::app::{ActivityLog, TuiLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_ENV: &str = "CODEGEN_PREVIEW_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber for headless commands.
///
/// Log level is controlled by the `CODEGEN_PREVIEW_LOG` env var (default: `info`).
/// Examples:
///   CODEGEN_PREVIEW_LOG=debug
///   CODEGEN_PREVIEW_LOG=codegen_preview::service=trace,info
///
/// Output goes to stderr so generated code on stdout stays pipeable.
pub fn init() {
    fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Route log events into the TUI activity pane instead of the terminal,
/// which belongs to the alternate screen while the TUI runs.
pub fn init_tui(log: ActivityLog) {
    tracing_subscriber::registry()
        .with(filter())
        .with(TuiLayer::new(log))
        .init();
}

/// Initialize logger for tests (does not panic if called multiple times).
#[cfg(test)]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
