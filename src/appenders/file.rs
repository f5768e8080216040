//! File appender implementation

use crate::core::{Appender, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends lines to a file, creating it if needed.
///
/// Each line is flushed as soon as it is written, so a crash loses at most
/// the line being written.
pub struct FileAppender {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("open", format!("cannot open {}", path.display()), e)
            })?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn append(&mut self, line: &[u8]) -> Result<()> {
        self.writer.write_all(line)?;
        self.writer.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "existing\n").unwrap();

        let mut appender = FileAppender::new(&path).unwrap();
        appender.append(b"{\"message\":\"a\"}\n").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "existing\n{\"message\":\"a\"}\n");
    }

    #[test]
    fn test_each_line_reaches_disk_without_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        let mut appender = FileAppender::new(&path).unwrap();
        assert_eq!(appender.path(), path.as_path());

        appender.append(b"one\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\n");

        appender.append(b"two\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_open_failure_names_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");

        let err = FileAppender::new(&path).err().unwrap();
        assert!(err.to_string().contains("app.log"));
    }
}
