//! Logging macros for ergonomic log message formatting.
//!
//! Each severity has a macro taking a format string and arguments, like
//! `format!`. Without a target the default logger is used; with one, the
//! target can be a [`Logger`](crate::Logger) or an [`Entry`](crate::Entry).
//!
//! # Examples
//!
//! ```
//! use cloud_logger_system::{info, warn, Logger, MemoryAppender};
//!
//! let logger = Logger::with_output(MemoryAppender::new());
//! let port = 8080;
//!
//! info!(logger, "Server listening on port {}", port);
//!
//! let entry = logger.with_labels([("component", "cache")]);
//! warn!(entry, "{} entries evicted", 12);
//!
//! // Default logger
//! info!("started in {}ms", 42);
//! ```

/// Log a formatted message at a given severity.
///
/// # Examples
///
/// ```
/// # use cloud_logger_system::{Logger, MemoryAppender, Severity};
/// # let logger = Logger::with_output(MemoryAppender::new());
/// use cloud_logger_system::log;
/// log!(logger, Severity::Notice, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// log!(Severity::Info, "to the default logger");
/// ```
#[macro_export]
macro_rules! log {
    ($severity:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::global::log($severity, ::std::format!($fmt $(, $arg)*))
    };
    ($target:expr, $severity:expr, $($arg:tt)+) => {
        $target.log($severity, ::std::format!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use cloud_logger_system::{Logger, MemoryAppender};
/// # let logger = Logger::with_output(MemoryAppender::new());
/// use cloud_logger_system::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::global::debug(::std::format!($fmt $(, $arg)*))
    };
    ($target:expr, $($arg:tt)+) => {
        $target.debug(::std::format!($($arg)+))
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::global::info(::std::format!($fmt $(, $arg)*))
    };
    ($target:expr, $($arg:tt)+) => {
        $target.info(::std::format!($($arg)+))
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::global::notice(::std::format!($fmt $(, $arg)*))
    };
    ($target:expr, $($arg:tt)+) => {
        $target.notice(::std::format!($($arg)+))
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::global::warn(::std::format!($fmt $(, $arg)*))
    };
    ($target:expr, $($arg:tt)+) => {
        $target.warn(::std::format!($($arg)+))
    };
}

/// Log an error-level message.
///
/// The emitted line carries a stack trace of the call site.
///
/// ```
/// # use cloud_logger_system::{Logger, MemoryAppender};
/// # let memory = MemoryAppender::new();
/// # let logger = Logger::with_output(memory.clone());
/// use cloud_logger_system::error;
/// error!(logger.with_error(Some("connection reset")), "request {} failed", 7);
/// # assert!(memory.records()[0]["exception"].is_string());
/// ```
#[macro_export]
macro_rules! error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::global::error(::std::format!($fmt $(, $arg)*))
    };
    ($target:expr, $($arg:tt)+) => {
        $target.error(::std::format!($($arg)+))
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::global::critical(::std::format!($fmt $(, $arg)*))
    };
    ($target:expr, $($arg:tt)+) => {
        $target.critical(::std::format!($($arg)+))
    };
}

/// Log an alert-level message.
#[macro_export]
macro_rules! alert {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::global::alert(::std::format!($fmt $(, $arg)*))
    };
    ($target:expr, $($arg:tt)+) => {
        $target.alert(::std::format!($($arg)+))
    };
}

/// Log an emergency-level message.
#[macro_export]
macro_rules! emergency {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::global::emergency(::std::format!($fmt $(, $arg)*))
    };
    ($target:expr, $($arg:tt)+) => {
        $target.emergency(::std::format!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use crate::{Logger, MemoryAppender, Severity};

    #[test]
    fn test_targeted_macros() {
        let memory = MemoryAppender::new();
        let logger = Logger::builder().output(memory.clone()).include_sources(false).build();
        let entry = logger.with_labels([("k", "v")]);
        let value = 42;

        crate::debug!(logger, "value = {}", value);
        crate::info!(entry, "value = {value}");
        crate::notice!(logger, "plain");
        crate::warn!(entry, "{}-{}", 1, 2);
        crate::log!(logger, Severity::Alert, "via log {}", value);

        let records = memory.records();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0]["message"], "value = 42");
        assert_eq!(records[0]["severity"], "DEBUG");
        assert_eq!(records[1]["message"], "value = 42");
        assert_eq!(records[1]["logging.googleapis.com/labels"]["k"], "v");
        assert_eq!(records[2]["message"], "plain");
        assert_eq!(records[3]["message"], "1-2");
        assert_eq!(records[3]["severity"], "WARNING");
        assert_eq!(records[4]["severity"], "ALERT");
    }

    #[test]
    fn test_macro_reports_call_site_line() {
        let memory = MemoryAppender::new();
        let logger = Logger::with_output(memory.clone());

        let line = line!() + 1;
        crate::info!(logger, "where am I");

        let records = memory.records();
        let source = &records[0]["logging.googleapis.com/sourceLocation"];
        assert_eq!(source["line"], line.to_string());
        assert!(source["file"].as_str().unwrap().ends_with("macros.rs"));
    }
}
