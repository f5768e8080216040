//! Main logger implementation

use super::{
    appender::Appender,
    entry::Entry,
    error::Result,
    metrics::LoggerMetrics,
    record::{Record, TraceContext},
    severity::Severity,
    source::{CallSite, SourceCache},
    stack::StackSnapshot,
};
use crate::appenders::{ConsoleAppender, WriterAppender};
use chrono::{SecondsFormat, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Writes structured log lines to one output, one whole line at a time.
///
/// `Logger` is a cheap handle: clones share the same output, settings and
/// metrics. Entries created from a logger hold such a handle.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

struct LoggerInner {
    /// Guards every write so concurrent lines never interleave
    output: Mutex<Box<dyn Appender>>,
    project: RwLock<String>,
    include_sources: AtomicBool,
    include_timestamp: AtomicBool,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Logger writing to stdout, with source locations enabled
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn with_output(appender: impl Appender + 'static) -> Self {
        Self::builder().output(appender).build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Replace the output. Lines already written are unaffected.
    pub fn set_output(&self, appender: impl Appender + 'static) {
        let mut output = self.inner.output.lock();
        *output = Box::new(appender);
    }

    /// Replace the output with any `io::Write`.
    pub fn set_writer<W: Write + Send + 'static>(&self, writer: W) {
        self.set_output(WriterAppender::new(writer));
    }

    /// Set the project used to qualify trace resource names
    pub fn set_project(&self, project: impl Into<String>) {
        *self.inner.project.write() = project.into();
    }

    pub fn project(&self) -> String {
        self.inner.project.read().clone()
    }

    /// Include the file, line and function of each log call
    pub fn set_include_sources(&self, include: bool) {
        self.inner.include_sources.store(include, Ordering::Relaxed);
    }

    pub fn include_sources(&self) -> bool {
        self.inner.include_sources.load(Ordering::Relaxed)
    }

    /// Include an RFC 3339 `timestamp` field in each line
    pub fn set_include_timestamp(&self, include: bool) {
        self.inner.include_timestamp.store(include, Ordering::Relaxed);
    }

    pub fn include_timestamp(&self) -> bool {
        self.inner.include_timestamp.load(Ordering::Relaxed)
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use cloud_logger_system::{Logger, MemoryAppender};
    ///
    /// let logger = Logger::with_output(MemoryAppender::new());
    /// logger.info("ready");
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.total_logged(), 1);
    /// assert_eq!(metrics.dropped_count(), 0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.metrics
    }

    pub fn dropped_count(&self) -> u64 {
        self.inner.metrics.dropped_count()
    }

    pub fn flush(&self) -> Result<()> {
        self.inner.output.lock().flush()
    }

    /// A fresh entry with no context attached
    pub fn entry(&self) -> Entry {
        Entry::new(self.clone())
    }

    /// Write one record for `entry`.
    ///
    /// Caller resolution, stack rendering and serialization all happen before
    /// the output lock is taken; the lock covers only the write itself.
    /// Failures are reported on stderr and never reach the caller.
    pub(crate) fn emit(
        &self,
        entry: &Entry,
        severity: Severity,
        message: String,
        caller: &'static Location<'static>,
    ) {
        let source = self
            .include_sources()
            .then(|| SourceCache::global().resolve(CallSite::from(caller)));

        let auto_stack = if entry.stack.is_none() && severity.is_error_class() {
            Some(StackSnapshot::capture())
        } else {
            None
        };
        let description = entry
            .error_message()
            .filter(|error| !error.is_empty())
            .unwrap_or(message.as_str());
        let stack_trace = entry
            .stack
            .as_ref()
            .or(auto_stack.as_ref())
            .map(|stack| stack.render(description));

        let mut record = Record::new(entry, severity, &message);
        record.source_location = source.as_deref();
        record.stack_trace = stack_trace.as_deref();
        if self.include_timestamp() {
            record.timestamp = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true));
        }

        let line = match record.to_line() {
            Ok(line) => line,
            Err(e) => {
                eprintln!("[LOGGER ERROR] could not marshal log: {}", e);
                self.inner.metrics.record_dropped();
                return;
            }
        };

        let mut output = self.inner.output.lock();
        let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            output.append(&line)
        }));

        match append_result {
            Ok(Ok(())) => {
                self.inner.metrics.record_logged();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", output.name(), e);
                self.inner.metrics.record_dropped();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Appender '{}' panicked: {}",
                    output.name(),
                    panic_msg
                );
                self.inner.metrics.record_dropped();
            }
        }
    }

    #[must_use]
    pub fn with_labels<I, K, V>(&self, labels: I) -> Entry
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Display,
    {
        self.entry().with_labels(labels)
    }

    #[must_use]
    pub fn with_detail<K: Into<String>, V: Serialize>(&self, key: K, value: V) -> Entry {
        self.entry().with_detail(key, value)
    }

    #[must_use]
    pub fn with_details<I, K, V>(&self, details: I) -> Entry
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        self.entry().with_details(details)
    }

    #[must_use]
    pub fn with_error<E: fmt::Display>(&self, err: Option<E>) -> Entry {
        self.entry().with_error(err)
    }

    #[must_use]
    pub fn with_span<T: TraceContext + ?Sized>(&self, span: &T) -> Entry {
        self.entry().with_span(span)
    }

    #[must_use]
    #[inline(never)]
    pub fn with_stack(&self) -> Entry {
        self.entry().with_stack()
    }

    #[must_use]
    pub fn with_operation(&self, id: impl Into<String>, producer: impl Into<String>) -> Entry {
        let mut entry = self.entry();
        entry.with_operation(id, producer);
        entry
    }

    /// New entry under an operation, announced at NOTICE
    #[track_caller]
    pub fn start_operation(&self, id: impl Into<String>, producer: impl Into<String>) -> Entry {
        let mut entry = self.entry();
        entry.start_operation(id, producer);
        entry
    }

    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl fmt::Display) {
        self.entry().log(severity, message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Severity::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Severity::Info, message);
    }

    #[track_caller]
    pub fn notice(&self, message: impl fmt::Display) {
        self.log(Severity::Notice, message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Severity::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Severity::Error, message);
    }

    #[track_caller]
    pub fn critical(&self, message: impl fmt::Display) {
        self.log(Severity::Critical, message);
    }

    #[track_caller]
    pub fn alert(&self, message: impl fmt::Display) {
        self.log(Severity::Alert, message);
    }

    #[track_caller]
    pub fn emergency(&self, message: impl fmt::Display) {
        self.log(Severity::Emergency, message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("project", &*self.inner.project.read())
            .field("include_sources", &self.include_sources())
            .field("include_timestamp", &self.include_timestamp())
            .field("metrics", &self.inner.metrics)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring a [`Logger`]
///
/// # Example
///
/// ```
/// use cloud_logger_system::{Logger, MemoryAppender};
///
/// let logger = Logger::builder()
///     .output(MemoryAppender::new())
///     .project("my-gcp-project")
///     .include_sources(false)
///     .build();
///
/// assert_eq!(logger.project(), "my-gcp-project");
/// ```
pub struct LoggerBuilder {
    output: Option<Box<dyn Appender>>,
    project: String,
    include_sources: bool,
    include_timestamp: bool,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            output: None,
            project: String::new(),
            include_sources: true,
            include_timestamp: false,
        }
    }

    /// Output for the logger; stdout when not set
    #[must_use]
    pub fn output(mut self, appender: impl Appender + 'static) -> Self {
        self.output = Some(Box::new(appender));
        self
    }

    #[must_use]
    pub fn writer<W: Write + Send + 'static>(self, writer: W) -> Self {
        self.output(WriterAppender::new(writer))
    }

    #[must_use]
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    #[must_use]
    pub fn include_sources(mut self, include: bool) -> Self {
        self.include_sources = include;
        self
    }

    #[must_use]
    pub fn include_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    pub fn build(self) -> Logger {
        let output = self
            .output
            .unwrap_or_else(|| Box::new(ConsoleAppender::new()));
        Logger {
            inner: Arc::new(LoggerInner {
                output: Mutex::new(output),
                project: RwLock::new(self.project),
                include_sources: AtomicBool::new(self.include_sources),
                include_timestamp: AtomicBool::new(self.include_timestamp),
                metrics: LoggerMetrics::new(),
            }),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
