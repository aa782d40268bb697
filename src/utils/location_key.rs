//! Location key normalization.
//!
//! Every cache read and write is keyed on a [`LocationKey`], and the only way
//! to obtain one is [`normalize_location`]. Lookups that differ only in case or
//! surrounding whitespace therefore share a single cache entry.

use std::fmt;

/// Minimum number of characters a normalized location must have.
pub const MIN_LOCATION_LENGTH: usize = 2;

/// Errors that can occur during location normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationKeyError {
    #[error("location must be at least 2 characters")]
    TooShort,
}

/// A normalized location string used as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey(String);

impl LocationKey {
    /// Returns the normalized key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key and returns the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LocationKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a raw location into a cache key.
///
/// # Normalization Rules
///
/// 1. Leading and trailing whitespace is trimmed
/// 2. The result is lowercased
///
/// No other transformation is applied: inner whitespace, punctuation and
/// diacritics are preserved.
///
/// # Errors
///
/// Returns [`LocationKeyError::TooShort`] if fewer than
/// [`MIN_LOCATION_LENGTH`] characters remain.
///
/// # Examples
///
/// ```
/// use geocode_cache::utils::location_key::normalize_location;
///
/// let key = normalize_location("  7th West, Oakland, CA  ").unwrap();
/// assert_eq!(key.as_str(), "7th west, oakland, ca");
/// assert!(normalize_location("a").is_err());
/// ```
pub fn normalize_location(raw: &str) -> Result<LocationKey, LocationKeyError> {
    let cleaned = raw.trim().to_lowercase();

    if cleaned.chars().count() < MIN_LOCATION_LENGTH {
        return Err(LocationKeyError::TooShort);
    }

    Ok(LocationKey(cleaned))
}
