//! Core logger types and traits

pub mod appender;
pub mod context;
pub mod entry;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod severity;
pub mod source;
pub(crate) mod stack;

pub use appender::Appender;
pub use context::ContextGuard;
pub use entry::Entry;
pub use error::{LoggerError, Result};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use record::{Operation, SpanContext, TraceContext};
pub use severity::Severity;
pub use source::{CallSite, LocationResolver, SourceCache, SourceLocation, SymbolResolver};
pub use stack::MAX_DEPTH as MAX_STACK_DEPTH;
