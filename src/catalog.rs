//! Catalog export parsing.
//!
//! The export is a `;`-delimited text table with a header row. Only the
//! `Magazine`, `Edition`, and `Year` columns are read (matched
//! case-insensitively); anything else is ignored. The delimiter is `;`
//! because the exports come from a locale where `,` is the decimal
//! separator.

use crate::record::Record;
use crate::{Error, Result};
use std::io::Read;

/// Column indices for the three fields we care about.
#[derive(Debug, Default)]
struct ColumnMap {
    magazine: Option<usize>,
    edition: Option<usize>,
    year: Option<usize>,
}

impl ColumnMap {
    /// Resolves header names to indices. All three columns are required;
    /// extra columns are ignored.
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let mut map = Self::default();

        for (i, header) in headers.iter().enumerate() {
            match header.trim().to_lowercase().as_str() {
                "magazine" => map.magazine = Some(i),
                "edition" => map.edition = Some(i),
                "year" => map.year = Some(i),
                _ => {}
            }
        }

        for (name, idx) in [
            ("Magazine", map.magazine),
            ("Edition", map.edition),
            ("Year", map.year),
        ] {
            if idx.is_none() {
                return Err(Error::InvalidInput(format!(
                    "input is missing the '{name}' column"
                )));
            }
        }

        Ok(map)
    }
}

/// Reads all records from a `;`-delimited export.
///
/// Rows may have fewer fields than the header; a missing or blank cell
/// becomes an empty string rather than an error.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| Error::op("read_csv_headers", e))?
        .clone();
    let map = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row.map_err(|e| Error::op("read_csv_row", e))?;
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .unwrap_or_default()
                .to_string()
        };
        records.push(Record::new(
            cell(map.magazine),
            cell(map.edition),
            cell(map.year),
        ));
    }

    tracing::debug!(count = records.len(), "parsed catalog export");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_semicolon_delimited_rows() {
        let input = "Magazine;Edition;Year\nVogue;12;2023\nElle;3;2024\n";
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record::new("Vogue", "12", "2023"));
        assert_eq!(records[1], Record::new("Elle", "3", "2024"));
    }

    #[test]
    fn test_header_match_is_case_insensitive() {
        let input = "magazine;EDITION;year\nVogue;12;2023\n";
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(records[0], Record::new("Vogue", "12", "2023"));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let input = "Price;Magazine;Edition;Year;Note\n4,50;Vogue;12;2023;gift\n";
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(records[0], Record::new("Vogue", "12", "2023"));
    }

    #[test]
    fn test_short_row_yields_empty_fields() {
        let input = "Magazine;Edition;Year\nVogue\n";
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(records[0], Record::new("Vogue", "", ""));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let input = "Magazine;Edition\nVogue;12\n";
        let err = read_records(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Year"));
    }

    #[test]
    fn test_empty_table() {
        let input = "Magazine;Edition;Year\n";
        let records = read_records(input.as_bytes()).unwrap();
        assert!(records.is_empty());
    }
}
