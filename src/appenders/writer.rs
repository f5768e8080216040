//! Appender over any `io::Write`

use crate::core::{Appender, Result};
use std::io::Write;

/// Adapts an arbitrary writer (socket, pipe, buffer) into an appender.
pub struct WriterAppender<W> {
    writer: W,
}

impl<W: Write + Send> WriterAppender<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Appender for WriterAppender<W> {
    fn append(&mut self, line: &[u8]) -> Result<()> {
        self.writer.write_all(line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_line_verbatim() {
        let mut appender = WriterAppender::new(Vec::new());
        appender.append(b"one\n").unwrap();
        appender.append(b"two\n").unwrap();
        assert_eq!(appender.into_inner(), b"one\ntwo\n");
    }
}
