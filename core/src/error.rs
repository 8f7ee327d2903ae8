//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Expansion itself never fails; these errors surface from configuration
/// loading, source reading, introspection lookups and report rendering.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Wrapper for YAML (de)serialization errors.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Wrapper for JSON serialization errors.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// A type or attribute could not be introspected.
    /// Created explicitly; callers usually downgrade it to an omission.
    #[from(ignore)]
    #[display("Introspection Error: {_0}")]
    Introspection(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
