//! Query result wrappers
//!
//! Both wrappers hold items exactly as the store returned them for that
//! fetch: no client-side re-filtering or re-ordering, never fewer or more
//! items than the store's page. Created fresh per call, never mutated after
//! return.

use serde::{Deserialize, Serialize};

/// One page of a continuation-token scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPagedResult<T> {
    /// Items in store-return order
    pub data: Vec<T>,

    /// Opaque continuation token; absent means the scan is exhausted
    pub token: Option<String>,
}

impl<T> TokenPagedResult<T> {
    /// Whether another page can be fetched by handing the token back.
    pub fn has_more(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl<T> Default for TokenPagedResult<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            token: None,
        }
    }
}

/// One page of an offset/limit scan with optional total count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in store-return order
    pub data: Vec<T>,

    /// 1-based page number this page was fetched as
    pub page_number: u32,

    /// Page size the fetch was limited to
    pub page_size: u32,

    /// Derived from the presence of a non-empty continuation token
    pub has_next_page: bool,

    /// Total matching items; `None` when no count was requested
    pub total_count: Option<u64>,
}
