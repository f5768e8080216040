//! Branchable log entries
//!
//! An [`Entry`] accumulates context (labels, details, error, trace, stack)
//! before a severity method fixes the message and writes it. Every `with_*`
//! call returns a new, independent entry, so a base entry can be shared and
//! specialized freely:
//!
//! ```
//! use cloud_logger_system::{Logger, MemoryAppender};
//!
//! let logger = Logger::with_output(MemoryAppender::new());
//! let request = logger.entry().with_labels([("request_id", "abc-123")]);
//!
//! request.with_detail("rows", 12).info("query finished");
//! request.info("response sent"); // no "rows" detail here
//! ```
//!
//! The operation methods are the exception: they take `&mut self` and change
//! the entry in place, so that the same entry can later end the operation it
//! started.

use super::logger::Logger;
use super::record::{DetailValue, Operation, TraceContext};
use super::severity::Severity;
use super::stack::StackSnapshot;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;

#[derive(Clone)]
pub struct Entry {
    logger: Logger,
    pub(crate) labels: Option<BTreeMap<String, String>>,
    pub(crate) details: Option<BTreeMap<String, DetailValue>>,
    pub(crate) operation: Option<Operation>,
    pub(crate) trace: String,
    pub(crate) span_id: String,
    pub(crate) trace_sampled: bool,
    pub(crate) error: Option<String>,
    pub(crate) stack: Option<StackSnapshot>,
}

impl Entry {
    pub(crate) fn new(logger: Logger) -> Self {
        Self {
            logger,
            labels: None,
            details: None,
            operation: None,
            trace: String::new(),
            span_id: String::new(),
            trace_sampled: false,
            error: None,
            stack: None,
        }
    }

    /// The logger this entry writes to
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.labels.as_ref()
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.as_ref()?.get(key).map(String::as_str)
    }

    /// A detail value, if present and representable as JSON
    pub fn detail(&self, key: &str) -> Option<&serde_json::Value> {
        self.details.as_ref()?.get(key)?.as_json()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }

    pub fn span_id(&self) -> &str {
        &self.span_id
    }

    pub fn trace_sampled(&self) -> bool {
        self.trace_sampled
    }

    pub fn has_stack(&self) -> bool {
        self.stack.is_some()
    }

    /// Child entry with the given labels added.
    ///
    /// Values are stored as their `Display` rendering, since Cloud Logging
    /// labels are strings.
    #[must_use]
    pub fn with_labels<I, K, V>(&self, labels: I) -> Entry
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Display,
    {
        let mut child = self.clone();
        let map = child.labels.get_or_insert_with(BTreeMap::new);
        for (key, value) in labels {
            map.insert(key.into(), value.to_string());
        }
        child
    }

    /// Child entry with one structured detail added
    #[must_use]
    pub fn with_detail<K, V>(&self, key: K, value: V) -> Entry
    where
        K: Into<String>,
        V: Serialize,
    {
        let mut child = self.clone();
        child
            .details
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), DetailValue::from_serialize(value));
        child
    }

    /// Child entry with several structured details added
    #[must_use]
    pub fn with_details<I, K, V>(&self, details: I) -> Entry
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        let mut child = self.clone();
        let map = child.details.get_or_insert_with(BTreeMap::new);
        for (key, value) in details {
            map.insert(key.into(), DetailValue::from_serialize(value));
        }
        child
    }

    /// Child entry carrying `err`'s message, or with the error cleared when
    /// `err` is `None`.
    ///
    /// Pairs well with `Result::err`:
    ///
    /// ```
    /// # use cloud_logger_system::{Logger, MemoryAppender};
    /// # let entry = Logger::with_output(MemoryAppender::new()).entry();
    /// let result: Result<(), std::io::Error> = Err(std::io::ErrorKind::NotFound.into());
    /// entry.with_error(result.as_ref().err()).warn("lookup failed");
    /// ```
    #[must_use]
    pub fn with_error<E: fmt::Display>(&self, err: Option<E>) -> Entry {
        let mut child = self.clone();
        child.error = err.map(|err| err.to_string());
        child
    }

    /// Child entry correlated with a trace span.
    ///
    /// The trace resource name is qualified with the logger's project. Without
    /// a project there is no valid resource name and the trace fields stay
    /// empty.
    #[must_use]
    pub fn with_span<T: TraceContext + ?Sized>(&self, span: &T) -> Entry {
        let mut child = self.clone();
        let project = self.logger.project();
        if project.is_empty() {
            child.trace.clear();
            child.span_id.clear();
            child.trace_sampled = false;
        } else {
            child.trace = format!("projects/{}/traces/{}", project, span.trace_id());
            child.span_id = span.span_id().to_string();
            child.trace_sampled = span.is_sampled();
        }
        child
    }

    /// Child entry carrying a snapshot of the current call stack.
    ///
    /// The stack is symbolized and rendered into the `exception` field only
    /// when the entry is emitted.
    #[must_use]
    #[inline(never)]
    pub fn with_stack(&self) -> Entry {
        let mut child = self.clone();
        child.stack = Some(StackSnapshot::capture());
        child
    }

    /// Attach an operation to this entry in place.
    pub fn with_operation(&mut self, id: impl Into<String>, producer: impl Into<String>) -> &mut Self {
        self.operation = Some(Operation::new(id, producer));
        self
    }

    /// Attach an operation in place and announce its start at NOTICE.
    ///
    /// Only the announcement carries `first`; later logs from this entry do
    /// not.
    #[track_caller]
    pub fn start_operation(&mut self, id: impl Into<String>, producer: impl Into<String>) -> &mut Self {
        let operation = Operation {
            first: true,
            ..Operation::new(id, producer)
        };
        let message = format!("{} starting operation {}", operation.producer, operation.id);
        self.operation = Some(operation);
        self.log(Severity::Notice, message);
        if let Some(operation) = self.operation.as_mut() {
            operation.first = false;
        }
        self
    }

    /// Announce the end of the current operation at NOTICE and detach it.
    ///
    /// Does nothing, and writes nothing, when no operation is attached.
    #[track_caller]
    pub fn end_operation(&mut self) {
        let Some(operation) = self.operation.as_mut() else {
            return;
        };
        operation.last = true;
        let message = format!("{} ending operation {}", operation.producer, operation.id);
        self.log(Severity::Notice, message);
        self.operation = None;
    }

    /// Write this entry at `severity`.
    ///
    /// Every severity method funnels into this.
    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl fmt::Display) {
        self.logger.emit(self, severity, message.to_string(), Location::caller());
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

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("labels", &self.labels)
            .field("details", &self.details)
            .field("operation", &self.operation)
            .field("trace", &self.trace)
            .field("span_id", &self.span_id)
            .field("trace_sampled", &self.trace_sampled)
            .field("error", &self.error)
            .field("has_stack", &self.stack.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::record::SpanContext;
    use serde_json::{json, Value};

    fn capture() -> (Logger, MemoryAppender) {
        let memory = MemoryAppender::new();
        let logger = Logger::builder()
            .output(memory.clone())
            .include_sources(false)
            .build();
        (logger, memory)
    }

    #[test]
    fn test_children_do_not_alias_parent() {
        let (logger, memory) = capture();
        let parent = logger
            .entry()
            .with_labels([("a", "1")])
            .with_detail("d", "parent");

        let child = parent
            .with_labels([("b", 2)])
            .with_detail("d", "child")
            .with_error(Some("boom"));

        assert_eq!(parent.label("b"), None);
        assert_eq!(parent.detail("d"), Some(&json!("parent")));
        assert_eq!(parent.error_message(), None);
        assert_eq!(child.label("a"), Some("1"));
        assert_eq!(child.label("b"), Some("2"));

        parent.info("p");
        let records = memory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["logging.googleapis.com/labels"], json!({"a": "1"}));
        assert_eq!(records[0]["details"], json!({"d": "parent"}));
        assert!(records[0].get("error").is_none());
    }

    #[test]
    fn test_with_error_none_clears() {
        let (logger, _) = capture();
        let failed = logger.entry().with_error(Some(std::fmt::Error));
        assert!(failed.error_message().is_some());

        let cleared = failed.with_error(None::<std::fmt::Error>);
        assert_eq!(cleared.error_message(), None);
        assert!(failed.error_message().is_some());
    }

    #[test]
    fn test_with_span_requires_project() {
        let (logger, _) = capture();
        let span = SpanContext::new("0af7651916cd43dd8448eb211c80319c", "b7ad6b7169203331").with_sampled(true);

        let without = logger.entry().with_span(&span);
        assert_eq!(without.trace(), "");
        assert_eq!(without.span_id(), "");
        assert!(!without.trace_sampled());

        logger.set_project("my-project");
        let with = logger.entry().with_span(&span);
        assert_eq!(
            with.trace(),
            "projects/my-project/traces/0af7651916cd43dd8448eb211c80319c"
        );
        assert_eq!(with.span_id(), "b7ad6b7169203331");
        assert!(with.trace_sampled());
    }

    #[test]
    fn test_start_operation_announces_once() {
        let (logger, memory) = capture();
        let mut entry = logger.entry();
        entry.start_operation("op-7", "importer");
        entry.info("working");

        let records = memory.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["severity"], "NOTICE");
        assert_eq!(records[0]["message"], "importer starting operation op-7");
        assert_eq!(records[0]["logging.googleapis.com/operation"]["first"], true);

        let op = &records[1]["logging.googleapis.com/operation"];
        assert_eq!(op["id"], "op-7");
        assert_eq!(op["producer"], "importer");
        assert!(op.get("first").is_none());
    }

    #[test]
    fn test_end_operation_without_operation_is_silent() {
        let (logger, memory) = capture();
        let mut entry = logger.entry();
        entry.end_operation();
        assert!(memory.lines().is_empty());
    }

    #[test]
    fn test_end_operation_clears() {
        let (logger, memory) = capture();
        let mut entry = logger.entry();
        entry.with_operation("op-1", "svc");
        entry.end_operation();
        entry.info("after");

        let records = memory.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["severity"], "NOTICE");
        assert_eq!(records[0]["logging.googleapis.com/operation"]["last"], true);
        assert!(records[1].get("logging.googleapis.com/operation").is_none());
        assert!(entry.operation().is_none());
    }

    #[test]
    fn test_with_stack_renders_on_emit() {
        let (logger, memory) = capture();
        logger.entry().with_stack().info("with stack");
        logger.entry().info("without stack");

        let records = memory.records();
        let exception = records[0]["exception"].as_str().unwrap();
        assert!(exception.starts_with("with stack\n\nstack backtrace:"));
        assert!(records[1].get("exception").is_none());
    }

    #[test]
    fn test_error_description_prefers_error_field() {
        let (logger, memory) = capture();
        logger
            .entry()
            .with_error(Some("disk full"))
            .error("write failed");

        let records = memory.records();
        let exception = records[0]["exception"].as_str().unwrap();
        assert!(exception.starts_with("disk full"));
        assert_eq!(records[0]["error"], "disk full");
        assert_eq!(records[0]["message"], "write failed");
    }

    #[test]
    fn test_error_getter_and_severity_coexist() {
        let (logger, memory) = capture();
        let entry = logger.entry().with_error(Some("disk full"));
        assert_eq!(entry.error_message(), Some("disk full"));

        entry.error("write failed");
        let records = memory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["severity"], "ERROR");
        assert_eq!(records[0]["error"], "disk full");
        assert_eq!(records[0]["message"], "write failed");
    }

    #[test]
    fn test_details_keep_structure() {
        let (logger, memory) = capture();
        logger
            .entry()
            .with_details([("count", json!(3)), ("tags", json!(["a", "b"]))])
            .info("structured");

        let records: Vec<Value> = memory.records();
        assert_eq!(records[0]["details"]["count"], 3);
        assert_eq!(records[0]["details"]["tags"], json!(["a", "b"]));
    }
}
