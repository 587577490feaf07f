// This file implements the installer's logging system.
// It provides macros for the different log levels (INFO, WARN, ERROR, DEBUG)
// and keeps every message on stderr so that stdout stays untouched when the
// installer is piped into a shell.

use std::sync::OnceLock; // Ensures the DEBUG_ENABLED flag is initialized exactly once.
use std::sync::atomic::{AtomicBool, Ordering}; // Thread-safe control of the debug flag.

// Re-exported so the exported macros can colorize without every call site
// importing `colored` itself.
#[doc(hidden)]
pub use colored::Colorize;

// `log_info!` for general installer progress.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => (eprintln!("{} {}", $crate::logger::Colorize::bright_green("[INFO]"), format!($($arg)*)));
}

// `log_warn!` for advisory, non-fatal conditions (PATH hints, shadowed binaries).
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => (eprintln!("{} {}", $crate::logger::Colorize::bright_yellow("[WARN]"), format!($($arg)*)));
}

// `log_error!` for the fatal diagnostic printed right before exiting.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => (eprintln!("{} {}", $crate::logger::Colorize::bright_red("[ERROR]"), format!($($arg)*)));
}

// `log_debug!` for detailed tracing of each stage.
// Only printed when debug mode was enabled through `init(true)`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if $crate::logger::is_debug_enabled() {
            eprintln!("{} {}", $crate::logger::Colorize::dimmed("[DEBUG]"), format!($($arg)*));
        }
    };
}

// Global flag to control debug logging.
static DEBUG_ENABLED: OnceLock<AtomicBool> = OnceLock::new();

/// Initializes the logger, setting the global debug mode.
/// Called once from `main` right after argument parsing.
///
/// # Arguments
/// * `debug`: If `true`, `log_debug!` messages are printed as well.
pub fn init(debug: bool) {
    DEBUG_ENABLED
        .get_or_init(|| AtomicBool::new(debug))
        .store(debug, Ordering::Relaxed);

    log_debug!("Logger initialized in DEBUG mode");
}

/// Checks if debug logging is currently enabled.
/// Used by the `log_debug!` macro; defaults to `false` when `init` never ran.
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED
        .get()
        .map(|f| f.load(Ordering::Relaxed))
        .unwrap_or(false)
}
