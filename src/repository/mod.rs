//! Typed repository engine and its query/pagination model.
//!
//! A [`DocumentRepository`] is generic over a [`DocumentEntity`] type and a
//! [`StoreClient`] implementation. Queries are driven by [`QueryOptions`] in
//! one of two mutually exclusive pagination styles:
//!
//! - **Continuation-token** ([`DocumentRepository::query_token_paged`]):
//!   thread the opaque token from each [`TokenPagedResult`] into the next
//!   call until it comes back absent.
//! - **Offset/limit** ([`DocumentRepository::query_paged`]): number pages by
//!   `(page_number, page_size)`; a concurrent count query fills
//!   [`PagedResult::total_count`] on request.
//!
//! [`DocumentEntity`]: crate::domain::DocumentEntity
//! [`StoreClient`]: crate::store::StoreClient

pub mod engine;
pub mod options;
pub mod results;
pub mod sql;

pub use engine::DocumentRepository;
pub use options::{FetchParams, QueryOptions};
pub use results::{PagedResult, TokenPagedResult};
pub use sql::count_sql;
