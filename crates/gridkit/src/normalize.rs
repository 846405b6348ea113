//! Case- and whitespace-insensitive comparison helpers.
//!
//! Column names, checkbox values and search text are all compared in their
//! normalized form: surrounding whitespace trimmed, then lower-cased.

/// Returns the normalized form of `s`.
pub fn normalized(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Returns `true` if `a` and `b` are equal once normalized.
pub fn same_normalized(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Returns `true` if the normalized `haystack` contains the normalized `needle`.
///
/// An empty needle is contained in everything.
pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&normalized(needle))
}
