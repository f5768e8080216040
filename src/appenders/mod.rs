//! Appender implementations

pub mod console;
pub mod file;
pub mod memory;
pub mod writer;

pub use console::{ConsoleAppender, Stream};
pub use file::FileAppender;
pub use memory::MemoryAppender;
pub use writer::WriterAppender;

pub use crate::core::Appender;
