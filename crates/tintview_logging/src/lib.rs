#![deny(missing_docs)]
//! Shared logging utilities for the tintview workspace.
//!
//! Provides the `tint_*` logging macros used across the crates, a
//! thread-local tag for the image request currently being worked on, and a
//! minimal test initializer for the global logger.
//!
//! Only threads that record a generation get the `[req N]` prefix. Engine
//! workers never do, so their lines carry request ids explicitly instead.

use std::cell::Cell;
use std::fmt;

thread_local! {
    /// Generation of the most recent image request seen by this thread.
    static REQUEST_GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// Records the image request generation for the current thread.
///
/// The app loop calls this whenever the state machine issues a new request so
/// that every log line emitted afterwards on that thread carries the tag.
pub fn set_request_generation(generation: u64) {
    REQUEST_GENERATION.with(|v| v.set(generation));
}

/// Returns the request generation for the current thread, or 0 before the
/// first request.
pub fn request_generation() -> u64 {
    REQUEST_GENERATION.with(|v| v.get())
}

/// Log prefix for the current thread's request generation.
///
/// Renders as `[req N] `, or as nothing while the generation is still 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTag(u64);

impl RequestTag {
    /// Captures the generation recorded on the calling thread.
    pub fn current() -> Self {
        Self(request_generation())
    }
}

impl fmt::Display for RequestTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return Ok(());
        }
        write!(f, "[req {}] ", self.0)
    }
}

/// Logs a trace-level message tagged with the current request generation.
#[macro_export]
macro_rules! tint_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::RequestTag::current(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current request generation.
#[macro_export]
macro_rules! tint_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::RequestTag::current(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current request generation.
#[macro_export]
macro_rules! tint_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::RequestTag::current(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current request generation.
#[macro_export]
macro_rules! tint_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::RequestTag::current(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current request generation.
#[macro_export]
macro_rules! tint_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::RequestTag::current(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
