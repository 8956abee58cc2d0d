//! Catalog records and content hashing.
//!
//! A record is normalized into a canonical key (lowercased, trimmed fields
//! joined with `|`) and hashed with SHA-256. The hex digest is the only
//! thing ever compared or persisted, so two rows that differ only in casing,
//! surrounding whitespace, or a missing cell collapse to the same token.

use sha2::{Digest, Sha256};

/// Delimiter between normalized fields in the canonical key. Not expected
/// to appear in catalog data.
const KEY_DELIMITER: &str = "|";

/// One catalog row: magazine name, edition, year.
///
/// All fields are plain text; numeric-looking cells are kept verbatim and a
/// missing cell is an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Magazine name.
    pub magazine: String,
    /// Edition identifier (often a number, kept as text).
    pub edition: String,
    /// Publication year (kept as text).
    pub year: String,
}

impl Record {
    /// Creates a record from raw cell values.
    pub fn new(
        magazine: impl Into<String>,
        edition: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            magazine: magazine.into(),
            edition: edition.into(),
            year: year.into(),
        }
    }

    /// Normalized, delimiter-joined form used for hashing.
    ///
    /// Each field is lowercased and trimmed; the three results are joined
    /// with [`KEY_DELIMITER`]. Rows that are the same under this
    /// normalization always produce an identical key.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        [&self.magazine, &self.edition, &self.year]
            .map(|field| normalize(field))
            .join(KEY_DELIMITER)
    }

    /// Lowercase hex SHA-256 digest of the canonical key.
    ///
    /// Deterministic function of the canonical key only; used purely as a
    /// set-membership token.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_key().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// The second label line, `Edition/Year`.
    #[must_use]
    pub fn edition_line(&self) -> String {
        format!("{}/{}", self.edition, self.year)
    }
}

/// Normalizes a single field for hashing: trim surrounding whitespace,
/// lowercase. Empty input stays empty.
fn normalize(field: &str) -> String {
    field.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key_joins_normalized_fields() {
        let record = Record::new("  Vogue ", "12", " 2023");
        assert_eq!(record.canonical_key(), "vogue|12|2023");
    }

    #[test]
    fn test_canonical_key_empty_fields() {
        let record = Record::new("", "", "");
        assert_eq!(record.canonical_key(), "||");
    }

    #[test]
    fn test_hash_is_64_hex_chars() {
        let hash = Record::new("Vogue", "12", "2023").content_hash();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_ignores_case_and_whitespace() {
        let a = Record::new("Vogue", "12", "2023").content_hash();
        let b = Record::new("vogue", " 12 ", "2023").content_hash();
        let c = Record::new(" VOGUE ", "12", "2023 ").content_hash();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_hash_distinguishes_fields() {
        let a = Record::new("Vogue", "12", "2023").content_hash();
        let b = Record::new("Vogue", "1", "22023").content_hash();
        assert_ne!(a, b);
    }

    #[test]
    fn test_edition_line() {
        let record = Record::new("Vogue", "12", "2023");
        assert_eq!(record.edition_line(), "12/2023");
    }
}
