//! Domain types for docstore.
//!
//! The domain layer provides:
//! - **Error types** ([`StoreError`]) classifying store status signals
//! - **Result type alias** ([`Result`])
//! - **Entity metadata** ([`DocumentEntity`], [`CollectionDescriptor`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, StoreError>`]:
//!
//! ```
//! use docstore::domain::{Result, StoreError};
//!
//! fn example() -> Result<()> {
//!     Err(StoreError::NotFound("order-1".to_string()))
//! }
//!
//! assert!(example().unwrap_err().is_not_found());
//! ```

pub mod descriptor;
pub mod errors;
pub mod result;

// Re-export commonly used types for convenience
pub use descriptor::{CollectionDescriptor, DocumentEntity};
pub use errors::StoreError;
pub use result::Result;
