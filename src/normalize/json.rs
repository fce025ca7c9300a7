//! JSON result documents
//!
//! The runner sometimes wraps the single run object in a `[` `]` pair. The
//! wrapper is stripped only when both brackets sit at the trimmed content's
//! boundaries; anything else is decoded as-is.

use super::{json_error, Schema};
use crate::error::{ReportError, Result};
use crate::model::PerformanceTestRun;

/// Remove a spurious array wrapper around a single run object
///
/// # Example
/// ```
/// use benchmark_reporter::normalize::strip_array_wrapper;
///
/// assert_eq!(strip_array_wrapper(" [{\"a\":1}] "), "{\"a\":1}");
/// assert_eq!(strip_array_wrapper("{\"a\":[1]}"), "{\"a\":[1]}");
/// ```
pub fn strip_array_wrapper(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => inner,
        None => trimmed,
    }
}

pub(super) fn parse<S: Schema>(text: &str) -> Result<PerformanceTestRun> {
    let body = strip_array_wrapper(text);
    if body.trim().is_empty() {
        return Err(ReportError::MalformedInput(
            "JSON document is empty".to_string(),
        ));
    }
    S::run(body)
}

/// Decode `T` from JSON, mapping failures onto the error kinds
pub(super) fn decode<'de, T: serde::Deserialize<'de>>(json: &'de str) -> Result<T> {
    serde_json::from_str(json).map_err(json_error)
}
