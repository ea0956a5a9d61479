//! CSV review input
//!
//! Reads a headed CSV, locates the `review` column and keeps every row whose
//! review cell is present. Cells holding common missing-value markers count
//! as absent.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::{InsightsError, Result};

/// Column that must be present in the header row
pub const REVIEW_COLUMN: &str = "review";

/// Hint appended to read/parse failures
pub const FORMAT_HINT: &str =
    "Please ensure your CSV file is properly formatted with a 'review' column";

/// Cell values treated as missing, as spreadsheet exports commonly write them
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Load reviews from a CSV file on disk
pub fn load_reviews(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| {
        InsightsError::Input(format!(
            "Error reading CSV file {}: {e}. {FORMAT_HINT}",
            path.display()
        ))
    })?;
    let reviews = read_reviews(file)?;
    info!("Loaded {} reviews from {}", reviews.len(), path.display());
    Ok(reviews)
}

/// Read reviews from any CSV source
pub fn read_reviews<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| InsightsError::Input(format!("Error reading CSV file: {e}. {FORMAT_HINT}")))?
        .clone();

    let column = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == REVIEW_COLUMN)
        .ok_or_else(|| {
            InsightsError::Input(format!(
                "CSV file must contain a column named '{REVIEW_COLUMN}'"
            ))
        })?;

    let mut reviews = Vec::new();
    let mut dropped = 0usize;
    for (row, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| {
            InsightsError::Input(format!(
                "Error reading CSV file at row {}: {e}. {FORMAT_HINT}",
                row + 1
            ))
        })?;

        match record.get(column) {
            Some(cell) if !is_missing(cell) => reviews.push(cell.to_string()),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("Dropped {} rows without a review", dropped);
    }

    if reviews.is_empty() {
        return Err(InsightsError::Input(
            "No valid reviews found in the CSV file".to_string(),
        ));
    }
    Ok(reviews)
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_reviews_basic() {
        let csv = "id,review,rating\n1,Great food,5\n2,\"Slow service, cold soup\",2\n";
        let reviews = read_reviews(csv.as_bytes()).unwrap();
        assert_eq!(reviews, vec!["Great food", "Slow service, cold soup"]);
    }

    #[test]
    fn test_read_reviews_drops_missing_cells() {
        let csv = "review,rating\nGood,5\n,3\nNaN,1\nFine,4\n";
        let reviews = read_reviews(csv.as_bytes()).unwrap();
        assert_eq!(reviews, vec!["Good", "Fine"]);
    }

    #[test]
    fn test_read_reviews_short_rows_are_missing() {
        let csv = "rating,review\n5,Lovely\n3\n";
        let reviews = read_reviews(csv.as_bytes()).unwrap();
        assert_eq!(reviews, vec!["Lovely"]);
    }

    #[test]
    fn test_read_reviews_multiline_cell() {
        let csv = "review\n\"Line one\nLine two\"\n";
        let reviews = read_reviews(csv.as_bytes()).unwrap();
        assert_eq!(reviews, vec!["Line one\nLine two"]);
    }

    #[test]
    fn test_read_reviews_bom_header() {
        let csv = "\u{feff}review\nTasty\n";
        let reviews = read_reviews(csv.as_bytes()).unwrap();
        assert_eq!(reviews, vec!["Tasty"]);
    }

    #[test]
    fn test_missing_column() {
        let csv = "text,rating\nGood,5\n";
        let err = read_reviews(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, InsightsError::Input(_)));
        assert_eq!(
            err.to_string(),
            "CSV file must contain a column named 'review'"
        );
    }

    #[test]
    fn test_no_valid_rows() {
        let csv = "review\n\n\"\"\nnull\n";
        let err = read_reviews(csv.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "No valid reviews found in the CSV file");
    }

    #[test]
    fn test_invalid_utf8_is_input_error() {
        let bytes: &[u8] = b"review\n\xff\xfe bad\n";
        let err = read_reviews(bytes).unwrap_err();
        assert!(err.to_string().contains(FORMAT_HINT));
    }

    #[test]
    fn test_load_reviews_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "review").unwrap();
        writeln!(file, "The menu was short").unwrap();
        drop(file);

        let reviews = load_reviews(&path).unwrap();
        assert_eq!(reviews, vec!["The menu was short"]);
    }

    #[test]
    fn test_load_reviews_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_reviews(&dir.path().join("absent.csv")).unwrap_err();
        assert!(err.to_string().starts_with("Error reading CSV file"));
    }
}
