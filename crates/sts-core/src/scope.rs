//! Space-joined scope and audience string handling.
//!
//! Scopes and audiences cross the storage boundary as single
//! space-separated strings and are split back into lists at the edges.

/// Splits a space-joined scope or audience string into its entries.
///
/// Consecutive whitespace is collapsed; an empty or all-whitespace input
/// yields an empty list.
#[must_use]
pub fn split(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Joins scope or audience entries into the space-joined storage form.
#[must_use]
pub fn join(entries: &[String]) -> String {
    entries.join(" ")
}
