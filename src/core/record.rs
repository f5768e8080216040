//! Wire format for Cloud Logging structured entries
//!
//! One [`Record`] is built per emission and serialized as a single JSON line.
//! Field names follow the special fields recognized by the logging agent, see
//! <https://cloud.google.com/logging/docs/agent/logging/configuration#special-fields>.

use super::entry::Entry;
use super::severity::Severity;
use super::source::SourceLocation;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The operation a given log entry is part of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub producer: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub first: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub last: bool,
}

impl Operation {
    pub fn new(id: impl Into<String>, producer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            producer: producer.into(),
            first: false,
            last: false,
        }
    }
}

/// Read-only view of a distributed trace span.
///
/// Implement this for the span type of whatever tracing library is in use;
/// [`SpanContext`] is a plain value implementation.
pub trait TraceContext {
    /// Hex-encoded trace id
    fn trace_id(&self) -> &str;
    /// Hex-encoded span id
    fn span_id(&self) -> &str;
    fn is_sampled(&self) -> bool;
}

/// Trace correlation identifiers for a span
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanContext {
    pub trace_id: String,
    pub span_id: String,
    pub sampled: bool,
}

impl SpanContext {
    pub fn new(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            sampled: false,
        }
    }

    pub fn with_sampled(mut self, sampled: bool) -> Self {
        self.sampled = sampled;
        self
    }
}

impl TraceContext for SpanContext {
    fn trace_id(&self) -> &str {
        &self.trace_id
    }

    fn span_id(&self) -> &str {
        &self.span_id
    }

    fn is_sampled(&self) -> bool {
        self.sampled
    }
}

/// A detail value as stored on an [`Entry`].
///
/// Values are converted to JSON when attached. A value that cannot be
/// represented keeps the conversion error, and serializing it fails, so the
/// record carrying it is dropped at emission instead of at the attach site.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DetailValue {
    Json(serde_json::Value),
    Unrepresentable(Arc<str>),
}

impl DetailValue {
    pub(crate) fn from_serialize<V: Serialize>(value: V) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => DetailValue::Json(json),
            Err(err) => DetailValue::Unrepresentable(err.to_string().into()),
        }
    }

    pub(crate) fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            DetailValue::Json(json) => Some(json),
            DetailValue::Unrepresentable(_) => None,
        }
    }
}

impl Serialize for DetailValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DetailValue::Json(json) => json.serialize(serializer),
            DetailValue::Unrepresentable(reason) => Err(S::Error::custom(reason)),
        }
    }
}

/// One emitted log line, borrowing from the entry it was produced from.
#[derive(Debug, Serialize)]
pub(crate) struct Record<'a> {
    pub message: &'a str,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(
        rename = "logging.googleapis.com/labels",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<&'a BTreeMap<String, String>>,
    #[serde(
        rename = "logging.googleapis.com/sourceLocation",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_location: Option<&'a SourceLocation>,
    #[serde(
        rename = "logging.googleapis.com/operation",
        skip_serializing_if = "Option::is_none"
    )]
    pub operation: Option<&'a Operation>,
    #[serde(
        rename = "logging.googleapis.com/trace",
        skip_serializing_if = "str::is_empty"
    )]
    pub trace: &'a str,
    #[serde(
        rename = "logging.googleapis.com/spanId",
        skip_serializing_if = "str::is_empty"
    )]
    pub span_id: &'a str,
    #[serde(
        rename = "logging.googleapis.com/trace_sampled",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub trace_sampled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a BTreeMap<String, DetailValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    #[serde(rename = "exception", skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<&'a str>,
}

impl<'a> Record<'a> {
    pub(crate) fn new(entry: &'a Entry, severity: Severity, message: &'a str) -> Self {
        Self {
            message,
            severity,
            timestamp: None,
            labels: entry.labels.as_ref().filter(|labels| !labels.is_empty()),
            source_location: None,
            operation: entry.operation.as_ref(),
            trace: &entry.trace,
            span_id: &entry.span_id,
            trace_sampled: entry.trace_sampled,
            details: entry.details.as_ref().filter(|details| !details.is_empty()),
            error: entry.error.as_deref().filter(|error| !error.is_empty()),
            stack_trace: None,
        }
    }

    /// Serialize as one newline-terminated JSON line.
    pub(crate) fn to_line(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}
