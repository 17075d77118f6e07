#![deny(missing_docs)]
//! Shared logging utilities for the report embedding workspace.
//!
//! This crate provides the `embed_*` logging macros used across the codebase,
//! a thread-local "active session" tag that every macro prefixes to its
//! message, and the initializers for the global logger.

use std::cell::Cell;
use std::fs::File;
use std::path::Path;

pub use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Thread-local storage for the attempt session currently being handled.
    static ACTIVE_SESSION: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Marks `session` as the attempt session being handled on this thread.
/// Pass `None` when the dispatcher leaves session-scoped work.
pub fn set_active_session(session: Option<u64>) {
    ACTIVE_SESSION.with(|v| v.set(session));
}

/// Retrieves the attempt session currently being handled on this thread.
pub fn active_session() -> Option<u64> {
    ACTIVE_SESSION.with(|v| v.get())
}

/// Renders the log prefix for the active session, `-` when none is set.
pub fn session_tag() -> String {
    match active_session() {
        Some(id) => format!("s{id}"),
        None => "-".to_string(),
    }
}

/// Logs a trace-level message tagged with the active session.
#[macro_export]
macro_rules! embed_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the active session.
#[macro_export]
macro_rules! embed_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the active session.
#[macro_export]
macro_rules! embed_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the active session.
#[macro_export]
macro_rules! embed_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the active session.
#[macro_export]
macro_rules! embed_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given log file.
    File,
    /// Write to terminal (stdout).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Initialize the global logger with the specified destination.
///
/// For `LogDestination::File` or `Both`, the file at `log_path` is truncated
/// and created. A file that cannot be created is reported on stderr and the
/// remaining loggers are still installed.
pub fn initialize(destination: LogDestination, level: LevelFilter, log_path: &Path) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File => match create_file_logger(level, config, log_path) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => {
            vec![TermLogger::new(
                level,
                config,
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )]
        }
        LogDestination::Both => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(level, config, log_path) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    log_path: &Path,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
