//! Error types for the culling engine
//!
//! The engine fails soft on misuse (unknown keys are no-ops, duplicate adds
//! are tracked twice). The only condition reported as an error is a
//! configuration that cannot describe a valid culler.

use std::fmt;

/// Result type for culling engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Culling engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration rejected at culler construction (e.g. non-positive cell size)
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Build an `Error::InvalidConfig`, logging it at ERROR with file:line first.
///
/// # Example
///
/// ```ignore
/// return Err(cull_config_err!("cull2d::SpatialHashCuller", "cell width must be > 0, got {}", w));
/// ```
#[macro_export]
macro_rules! cull_config_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::cull_error!($source, "{}", message);
        $crate::cull2d::Error::InvalidConfig(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
