//! SQL fragment helpers
//!
//! The count rewrite replaces everything before the FROM clause with
//! `SELECT VALUE COUNT(1)`, preserving the FROM clause and every predicate
//! after it verbatim. The FROM keyword is located token-aware: the first
//! whitespace-delimited, case-insensitive `FROM` outside single-quoted string
//! literals, so a literal like `'from paris'` or an identifier like
//! `c.from_date` never confuses the rewrite.

use crate::domain::errors::StoreError;
use crate::domain::result::Result;

/// Rewrite a query into its counting form.
///
/// `SELECT c.id FROM c WHERE c.active = true` becomes
/// `SELECT VALUE COUNT(1) FROM c WHERE c.active = true`.
///
/// # Errors
///
/// Returns [`StoreError::Query`] when the query has no FROM clause.
pub fn count_sql(sql: &str) -> Result<String> {
    let from_index = find_from_clause(sql).ok_or_else(|| {
        StoreError::Query(format!("query has no FROM clause to count over: {sql}"))
    })?;
    Ok(format!("SELECT VALUE COUNT(1) {}", &sql[from_index..]))
}

/// Locate the byte offset of the first FROM keyword outside string literals.
fn find_from_clause(sql: &str) -> Option<usize> {
    let bytes = sql.as_bytes();
    let mut in_literal = false;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c == b'\'' {
            in_literal = !in_literal;
            i += 1;
            continue;
        }
        if !in_literal && i + 4 <= bytes.len() && bytes[i..i + 4].eq_ignore_ascii_case(b"from") {
            let boundary_before = i == 0 || is_boundary(bytes[i - 1]);
            let boundary_after = i + 4 == bytes.len() || is_boundary(bytes[i + 4]);
            if boundary_before && boundary_after {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

fn is_boundary(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == b'(' || byte == b')'
}

/// Quote a value as a SQL string literal, escaping backslashes and quotes.
pub(crate) fn quote_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}
