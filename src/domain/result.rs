//! Result type alias for docstore
//!
//! Convenience alias that uses `StoreError` as the error type.

use super::errors::StoreError;

/// Result type alias for docstore operations
///
/// Use this throughout the crate for fallible operations.
///
/// # Examples
///
/// ```
/// use docstore::domain::result::Result;
/// use docstore::domain::errors::StoreError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(StoreError::Query("invalid SQL".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, StoreError>;
