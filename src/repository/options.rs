//! Query option model
//!
//! Normalizes page number/size, partition key, continuation token, and the
//! "needs total count" flag into a single value, and derives from it the
//! store-level fetch parameters and the offset/limit SQL suffix.
//!
//! Page-number and continuation-token pagination are mutually exclusive
//! strategies: offset/limit recomputes the position from
//! `(page_number - 1) * page_size`, while continuation pagination advances via
//! the opaque token returned by the previous call and ignores `page_number`.

use crate::domain::errors::StoreError;
use crate::domain::result::Result;

/// Options controlling a repository query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// 1-based page number for offset/limit pagination
    pub page_number: u32,

    /// Maximum items per page
    pub page_size: u32,

    /// Opaque store-issued continuation token from the previous page
    pub continuation_token: Option<String>,

    /// Partition key scoping the query; absent implies cross-partition
    pub partition_key: Option<String>,

    /// Run a concurrent count query and report the total alongside the page
    pub requires_total_count: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 10,
            continuation_token: None,
            partition_key: None,
            requires_total_count: false,
        }
    }
}

impl QueryOptions {
    /// Create options with default paging (page 1, size 10).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the 1-based page number.
    pub fn page_number(mut self, page_number: u32) -> Self {
        self.page_number = page_number;
        self
    }

    /// Set the page size.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the continuation token from a previous page.
    pub fn continuation_token(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }

    /// Scope the query to a single partition.
    pub fn partition_key(mut self, key: impl Into<String>) -> Self {
        self.partition_key = Some(key.into());
        self
    }

    /// Request a concurrent total count alongside the page.
    pub fn with_total_count(mut self) -> Self {
        self.requires_total_count = true;
        self
    }

    /// Derive the store-level fetch parameters from these options.
    ///
    /// The partition key is carried only when present and non-blank;
    /// otherwise the fetch implies cross-partition scanning. The continuation
    /// token passes through verbatim; `None` means "start from the beginning".
    pub fn fetch_params(&self) -> FetchParams {
        let partition_key = self
            .partition_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(str::to_string);

        FetchParams {
            max_items: self.page_size,
            continuation_token: self.continuation_token.clone(),
            partition_key,
        }
    }

    /// Append an `OFFSET … LIMIT …` suffix derived from the page number/size.
    ///
    /// `page_number <= 1` clamps to offset 0. The base SQL must not already
    /// carry OFFSET/LIMIT and must not end in a semicolon; both are rejected
    /// rather than producing a query the store would misinterpret.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if the base SQL is empty, ends with a
    /// semicolon, or already contains an OFFSET or LIMIT clause.
    pub fn with_offset_limit(&self, sql: &str) -> Result<String> {
        let trimmed = sql.trim();
        if trimmed.is_empty() {
            return Err(StoreError::Query(
                "cannot append OFFSET/LIMIT to an empty query".to_string(),
            ));
        }
        if trimmed.ends_with(';') {
            return Err(StoreError::Query(format!(
                "query must not end with a semicolon: {trimmed}"
            )));
        }
        let has_paging_clause = trimmed
            .split_whitespace()
            .any(|word| word.eq_ignore_ascii_case("OFFSET") || word.eq_ignore_ascii_case("LIMIT"));
        if has_paging_clause {
            return Err(StoreError::Query(format!(
                "query already contains an OFFSET or LIMIT clause: {trimmed}"
            )));
        }

        let offset = (self.page_number.max(1) - 1) * self.page_size;
        Ok(format!(
            "{trimmed} OFFSET {offset} LIMIT {}",
            self.page_size
        ))
    }
}

/// Store-level fetch parameters derived from [`QueryOptions`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchParams {
    /// Maximum items the store may return in one page
    pub max_items: u32,

    /// Opaque continuation token; `None` starts from the beginning
    pub continuation_token: Option<String>,

    /// Partition key; `None` requires explicit cross-partition execution
    pub partition_key: Option<String>,
}

impl FetchParams {
    /// Whether the fetch must opt into cross-partition execution.
    pub fn cross_partition(&self) -> bool {
        self.partition_key.is_none()
    }
}
