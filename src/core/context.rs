//! Ambient entry propagation
//!
//! An [`Entry`] can be attached to the current thread so that code further
//! down the call chain logs with the same labels, trace and operation without
//! threading the entry through every signature.
//!
//! ```
//! use cloud_logger_system::{context, Logger, MemoryAppender};
//!
//! let logger = Logger::with_output(MemoryAppender::new());
//! let request = logger.entry().with_labels([("request_id", "abc-123")]);
//!
//! context::scope(request, || {
//!     context::from_context().info("handled"); // carries request_id
//! });
//! ```

use super::entry::Entry;
use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    static CURRENT: RefCell<Option<Entry>> = const { RefCell::new(None) };
}

/// RAII guard for an attached entry
///
/// Dropping the guard restores whatever entry was attached before it. Guards
/// must be dropped in reverse order of creation, which holds naturally for
/// guards bound to scopes.
#[must_use = "the entry is detached as soon as the guard is dropped"]
pub struct ContextGuard {
    previous: Option<Entry>,
    // Guards restore thread-local state and must stay on their thread
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|current| *current.borrow_mut() = previous);
    }
}

/// Attach `entry` to the current thread until the returned guard drops
pub fn with_context(entry: Entry) -> ContextGuard {
    let previous = CURRENT.with(|current| current.borrow_mut().replace(entry));
    ContextGuard {
        previous,
        _not_send: PhantomData,
    }
}

/// Run `f` with `entry` attached to the current thread
pub fn scope<R>(entry: Entry, f: impl FnOnce() -> R) -> R {
    let _guard = with_context(entry);
    f()
}

/// The attached entry, or a fresh entry on the default logger
pub fn from_context() -> Entry {
    current().unwrap_or_else(crate::global::new_entry)
}

/// The attached entry, if any
pub fn current() -> Option<Entry> {
    CURRENT.with(|current| current.borrow().clone())
}
