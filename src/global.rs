//! Process-wide default logger
//!
//! The default [`Logger`] writes to stdout with source locations enabled. It
//! is created on first use and lives for the rest of the process; the free
//! functions in this module delegate to it.
//!
//! ```
//! use cloud_logger_system::global;
//!
//! global::info("service started");
//! global::with_labels([("component", "db")]).warn("slow query");
//! ```

use crate::core::{Appender, Entry, Logger, Severity, TraceContext};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::sync::OnceLock;

static DEFAULT: OnceLock<Logger> = OnceLock::new();

/// The process-wide default logger
pub fn default_logger() -> &'static Logger {
    DEFAULT.get_or_init(Logger::new)
}

/// Replace the default logger's output
pub fn set_output(appender: impl Appender + 'static) {
    default_logger().set_output(appender);
}

pub fn set_writer<W: Write + Send + 'static>(writer: W) {
    default_logger().set_writer(writer);
}

pub fn set_project(project: impl Into<String>) {
    default_logger().set_project(project);
}

pub fn set_include_sources(include: bool) {
    default_logger().set_include_sources(include);
}

pub fn set_include_timestamp(include: bool) {
    default_logger().set_include_timestamp(include);
}

/// A fresh entry on the default logger
pub fn new_entry() -> Entry {
    default_logger().entry()
}

pub fn with_labels<I, K, V>(labels: I) -> Entry
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: fmt::Display,
{
    default_logger().with_labels(labels)
}

pub fn with_detail<K: Into<String>, V: Serialize>(key: K, value: V) -> Entry {
    default_logger().with_detail(key, value)
}

pub fn with_details<I, K, V>(details: I) -> Entry
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Serialize,
{
    default_logger().with_details(details)
}

pub fn with_error<E: fmt::Display>(err: Option<E>) -> Entry {
    default_logger().with_error(err)
}

pub fn with_span<T: TraceContext + ?Sized>(span: &T) -> Entry {
    default_logger().with_span(span)
}

#[inline(never)]
pub fn with_stack() -> Entry {
    default_logger().with_stack()
}

pub fn with_operation(id: impl Into<String>, producer: impl Into<String>) -> Entry {
    default_logger().with_operation(id, producer)
}

#[track_caller]
pub fn start_operation(id: impl Into<String>, producer: impl Into<String>) -> Entry {
    default_logger().start_operation(id, producer)
}

#[track_caller]
pub fn log(severity: Severity, message: impl fmt::Display) {
    default_logger().log(severity, message);
}

#[track_caller]
pub fn debug(message: impl fmt::Display) {
    log(Severity::Debug, message);
}

#[track_caller]
pub fn info(message: impl fmt::Display) {
    log(Severity::Info, message);
}

#[track_caller]
pub fn notice(message: impl fmt::Display) {
    log(Severity::Notice, message);
}

#[track_caller]
pub fn warn(message: impl fmt::Display) {
    log(Severity::Warning, message);
}

#[track_caller]
pub fn error(message: impl fmt::Display) {
    log(Severity::Error, message);
}

#[track_caller]
pub fn critical(message: impl fmt::Display) {
    log(Severity::Critical, message);
}

#[track_caller]
pub fn alert(message: impl fmt::Display) {
    log(Severity::Alert, message);
}

#[track_caller]
pub fn emergency(message: impl fmt::Display) {
    log(Severity::Emergency, message);
}
