//! Router error types.

use thiserror::Error;

/// Errors raised while setting up routing.
///
/// Resolving a path never fails; unmatched paths fall back to the
/// not-found route or to the home route instead.
#[derive(Error, Debug)]
pub enum RouterError {
    /// A pattern could not be compiled into a matcher.
    #[error("Invalid route pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// No browser window is available.
    #[error("No browser window available")]
    NoWindow,

    /// A browser API call failed.
    #[error("Browser error: {0}")]
    Browser(String),
}
