//! Call-stack snapshots
//!
//! Capturing only records raw instruction pointers. Symbolization happens
//! when the entry is emitted, and only for entries that carry a snapshot.

use std::fmt::Write as _;
use std::sync::Arc;

/// Frames kept in a rendered trace.
pub const MAX_DEPTH: usize = 16;

/// Extra frames captured to make room for logger internals that are
/// stripped when rendering.
const INTERNAL_ALLOWANCE: usize = 8;

const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

#[derive(Debug, Clone)]
pub(crate) struct StackSnapshot {
    ips: Arc<[usize]>,
}

struct Frame {
    function: String,
    file: Option<String>,
    line: Option<u32>,
}

impl StackSnapshot {
    #[inline(never)]
    pub(crate) fn capture() -> Self {
        let mut ips = Vec::with_capacity(MAX_DEPTH + INTERNAL_ALLOWANCE);
        backtrace::trace(|frame| {
            ips.push(frame.ip() as usize);
            ips.len() < MAX_DEPTH + INTERNAL_ALLOWANCE
        });
        Self { ips: ips.into() }
    }

    /// Render as a multi-line trace headed by `description`.
    ///
    /// ```text
    /// connection refused
    ///
    /// stack backtrace:
    ///    0: my_app::db::connect
    ///              at src/db.rs:42
    /// ```
    pub(crate) fn render(&self, description: &str) -> String {
        let mut out = String::with_capacity(1024);
        out.push_str(description);
        out.push_str("\n\nstack backtrace:\n");

        let frames = self
            .symbolize()
            .into_iter()
            .skip_while(|frame| is_internal(&frame.function))
            .take(MAX_DEPTH);

        for (index, frame) in frames.enumerate() {
            let _ = writeln!(out, "{:>4}: {}", index, frame.function);
            if let (Some(file), Some(line)) = (&frame.file, frame.line) {
                let _ = writeln!(out, "             at {}:{}", file, line);
            }
        }
        out
    }

    /// Inlined calls yield several symbols per instruction pointer; each one
    /// becomes its own frame, innermost first.
    fn symbolize(&self) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(self.ips.len());
        for &ip in self.ips.iter() {
            let before = frames.len();
            backtrace::resolve(ip as *mut std::ffi::c_void, |symbol| {
                frames.push(Frame {
                    function: symbol
                        .name()
                        .map(|name| format!("{:#}", name))
                        .unwrap_or_else(|| "<unknown>".to_string()),
                    file: symbol.filename().map(|path| path.display().to_string()),
                    line: symbol.lineno(),
                });
            });
            if frames.len() == before {
                frames.push(Frame {
                    function: format!("<unknown> ({:#x})", ip),
                    file: None,
                    line: None,
                });
            }
        }
        frames
    }
}

fn is_internal(function: &str) -> bool {
    let function = function.trim_start_matches('<');
    function.starts_with("backtrace::") || function.starts_with(CRATE_PREFIX)
}
