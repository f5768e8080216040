//! In-memory appender for capturing output

use crate::core::{Appender, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects lines in a shared buffer.
///
/// Clones share the buffer: hand one clone to a logger and keep another to
/// inspect what was written.
///
/// ```
/// use cloud_logger_system::{Logger, MemoryAppender};
///
/// let memory = MemoryAppender::new();
/// let logger = Logger::with_output(memory.clone());
/// logger.info("captured");
///
/// assert_eq!(memory.records()[0]["message"], "captured");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    /// Every line parsed as JSON; lines that are not valid JSON are skipped
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, line: &[u8]) -> Result<()> {
        self.buffer.lock().extend_from_slice(line);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let memory = MemoryAppender::new();
        let mut writer = memory.clone();
        writer.append(b"{\"n\":1}\nnot json\n").unwrap();

        assert_eq!(memory.lines(), vec!["{\"n\":1}", "not json"]);
        assert_eq!(memory.records().len(), 1);

        memory.clear();
        assert!(memory.contents().is_empty());
    }
}
