//! Result type alias for Tabula

use super::errors::TabulaError;

/// Result type alias for Tabula operations
///
/// This is a convenience type alias that uses `TabulaError` as the error type.
/// Use this throughout the codebase for fallible operations.
pub type Result<T> = std::result::Result<T, TabulaError>;
