//! Caller-location resolution and caching
//!
//! Emission methods are `#[track_caller]`, so the file, line and column of the
//! user's call site are known for free. The enclosing function name is not,
//! and finding it means walking and symbolizing the stack. [`SourceCache`]
//! does that once per call site and serves every later lookup from memory.

use parking_lot::RwLock;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Source location that originated a log call.
///
/// Serialized the way Cloud Logging expects `sourceLocation`, with the line
/// number as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file: String,
    #[serde(serialize_with = "line_as_string")]
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

fn line_as_string<S: Serializer>(line: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(line)
}

/// Identity of a call site in the program text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl CallSite {
    /// The call site of the nearest caller not marked `#[track_caller]`.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

/// Turns a call site into a full source location.
///
/// Resolution may be slow; results are cached by [`SourceCache`] and never
/// recomputed for the same site.
pub trait LocationResolver: Send + Sync {
    fn resolve(&self, site: CallSite) -> SourceLocation;
}

/// Default resolver: finds the function enclosing the call site by
/// symbolizing the current stack with the `backtrace` crate.
///
/// The function is left unset when debug info is unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolResolver;

impl LocationResolver for SymbolResolver {
    fn resolve(&self, site: CallSite) -> SourceLocation {
        SourceLocation {
            file: site.file.to_string(),
            line: site.line,
            function: enclosing_function(&site),
        }
    }
}

/// Walk the live stack looking for a symbol in the call site's file.
///
/// A symbol on the exact line wins; otherwise the innermost symbol from the
/// same file is used.
fn enclosing_function(site: &CallSite) -> Option<String> {
    let wanted = Path::new(site.file);
    let mut exact = None;
    let mut nearest = None;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if exact.is_some() {
                return;
            }
            let (Some(file), Some(name)) = (symbol.filename(), symbol.name()) else {
                return;
            };
            if !file.ends_with(wanted) {
                return;
            }
            let name = format!("{:#}", name);
            if symbol.lineno() == Some(site.line) {
                exact = Some(name);
            } else if nearest.is_none() {
                nearest = Some(name);
            }
        });
        exact.is_none()
    });

    exact.or(nearest)
}

/// Concurrent cache from call site to resolved source location.
///
/// Read-mostly: lookups take a shared lock, and only a miss takes the
/// exclusive one to insert. Entries are never evicted; the number of call
/// sites is bounded by the program text.
pub struct SourceCache {
    entries: RwLock<HashMap<CallSite, Arc<SourceLocation>>>,
    resolver: Box<dyn LocationResolver>,
    resolutions: AtomicU64,
}

impl SourceCache {
    pub fn new(resolver: impl LocationResolver + 'static) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            resolver: Box::new(resolver),
            resolutions: AtomicU64::new(0),
        }
    }

    /// Process-wide cache shared by every [`Logger`](crate::Logger).
    pub fn global() -> &'static SourceCache {
        static GLOBAL: OnceLock<SourceCache> = OnceLock::new();
        GLOBAL.get_or_init(|| SourceCache::new(SymbolResolver))
    }

    pub fn resolve(&self, site: CallSite) -> Arc<SourceLocation> {
        if let Some(hit) = self.entries.read().get(&site) {
            return Arc::clone(hit);
        }

        // Resolve outside the lock; two threads racing on the same site both
        // compute the same answer and the first insert wins.
        let resolved = Arc::new(self.resolver.resolve(site));
        self.resolutions.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.write();
        Arc::clone(entries.entry(site).or_insert(resolved))
    }

    /// Number of cached call sites
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Number of times the resolver was invoked (cache misses)
    pub fn resolutions(&self) -> u64 {
        self.resolutions.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for SourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceCache")
            .field("len", &self.len())
            .field("resolutions", &self.resolutions())
            .finish()
    }
}
