//! Appender trait for log output destinations

use super::error::Result;

/// Destination for serialized log lines.
///
/// Each call to [`append`](Appender::append) receives one complete,
/// newline-terminated JSON line and should write it in a single operation.
/// The logger serializes calls, so implementations need not lock.
pub trait Appender: Send {
    fn append(&mut self, line: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
