#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use paramdoc_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Directory traversal failure.
    #[display("Walk Error: {}", _0)]
    Walk(walkdir::Error),

    /// Failure reported by the core library.
    #[display("{}", _0)]
    Core(AppError),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// We implement this manually (instead of `derive(Error)`) because the `General(String)`
/// variant contains a `String`, which does not implement `std::error::Error`, causing
/// auto-derived `source()` implementations to fail compilation.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_display_is_passed_through() {
        let err: CliError = AppError::General("boom".into()).into();
        assert_eq!(err.to_string(), "General Error: boom");
    }

    #[test]
    fn test_general_from_string() {
        let err: CliError = String::from("bad input").into();
        assert!(matches!(err, CliError::General(_)));
    }
}
