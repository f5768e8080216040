//! # Cloud Logger System
//!
//! Structured logging for Google Cloud Logging (formerly Stackdriver). Each
//! log call writes one JSON object per line in the format the logging agent
//! understands, so severity, labels, trace correlation, operations and
//! source locations show up as first-class fields in the log viewer.
//!
//! ## Features
//!
//! - **Branchable entries**: `with_*` calls return independent children, so
//!   a request-scoped entry can be shared and specialized freely
//! - **Caller locations**: file, line and function of every log call,
//!   resolved once per call site and cached
//! - **Stack traces**: captured cheaply, symbolized only when written, and
//!   attached automatically to ERROR and above
//! - **Operations and traces**: first/last markers for long-running
//!   operations, span correlation through [`TraceContext`]
//! - **Thread safe**: whole lines are written under one lock per logger
//!
//! The crate also carries two small utilities: [`FlagSet`] for flags that
//! can be overridden from the environment, and the [`dev`] helpers.
//!
//! ## Example
//!
//! ```
//! use cloud_logger_system::{Logger, MemoryAppender, SpanContext};
//!
//! let memory = MemoryAppender::new();
//! let logger = Logger::builder()
//!     .output(memory.clone())
//!     .project("my-project")
//!     .build();
//!
//! let request = logger
//!     .with_labels([("request_id", "abc-123")])
//!     .with_span(&SpanContext::new("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7"));
//!
//! request.with_detail("rows", 12).info("query finished");
//!
//! let record = &memory.records()[0];
//! assert_eq!(record["severity"], "INFO");
//! assert_eq!(record["details"]["rows"], 12);
//! ```

pub mod appenders;
pub mod config;
pub mod core;
pub mod dev;
pub mod global;
pub mod macros;

pub use crate::core::context;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender, WriterAppender};
    pub use crate::core::context::{from_context, scope, with_context};
    pub use crate::core::{
        Appender, Entry, Logger, LoggerBuilder, LoggerError, Operation, Result, Severity,
        SpanContext, TraceContext,
    };
}

pub use appenders::{ConsoleAppender, FileAppender, MemoryAppender, WriterAppender};
pub use config::{ConfigError, FlagSet, OverrideFailure};
pub use crate::core::context::{from_context, scope, with_context};
pub use crate::core::{
    Appender, CallSite, ContextGuard, Entry, LocationResolver, Logger, LoggerBuilder, LoggerError,
    LoggerMetrics, Operation, Result, Severity, SourceCache, SourceLocation, SpanContext,
    SymbolResolver, TraceContext, MAX_STACK_DEPTH,
};
pub use dev::{fail_fast, NotImplementedError};
pub use global::{
    alert, critical, debug, default_logger, emergency, error, info, new_entry, notice,
    set_include_sources, set_include_timestamp, set_output, set_project, set_writer,
    start_operation, warn, with_detail, with_details, with_error, with_labels, with_operation,
    with_span, with_stack,
};
