//! Development helpers
//!
//! Shortcuts for code that is still being written. None of this belongs on
//! a production path.

use crate::core::source::{CallSite, SourceCache};
use std::fmt;
use thiserror::Error;

/// Return the value of `result`, or panic with its error.
///
/// ```should_panic
/// use cloud_logger_system::dev::fail_fast;
///
/// let port: u16 = fail_fast("not a port".parse::<u16>());
/// ```
#[track_caller]
pub fn fail_fast<T, E: fmt::Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{}", err),
    }
}

/// Marks functionality that has not been built yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not implemented: {function}")]
pub struct NotImplementedError {
    pub file: String,
    pub line: u32,
    pub function: String,
}

impl NotImplementedError {
    /// Error describing the caller.
    ///
    /// The function name comes from the caller-location cache and is
    /// `"unknown"` when it cannot be resolved. [`not_implemented!`] names the
    /// function at compile time instead.
    ///
    /// [`not_implemented!`]: crate::not_implemented
    #[track_caller]
    pub fn here() -> Self {
        let location = SourceCache::global().resolve(CallSite::caller());
        Self {
            file: location.file.clone(),
            line: location.line,
            function: location
                .function
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

/// A [`NotImplementedError`](crate::dev::NotImplementedError) for the
/// enclosing function.
///
/// ```
/// use cloud_logger_system::dev::NotImplementedError;
///
/// fn export() -> Result<(), NotImplementedError> {
///     Err(cloud_logger_system::not_implemented!())
/// }
///
/// let err = export().unwrap_err();
/// assert!(err.function.ends_with("export"));
/// assert_eq!(err.to_string(), format!("not implemented: {}", err.function));
/// ```
#[macro_export]
macro_rules! not_implemented {
    () => {
        $crate::dev::NotImplementedError {
            file: ::std::string::String::from(::std::file!()),
            line: ::std::line!(),
            function: ::std::string::String::from($crate::__function_name!()),
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}
