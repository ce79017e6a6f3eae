//! CSV checker.
//!
//! Applies to uploaded files: the declared type gates the check, then the
//! whole body is parsed with a header row after a strict quoting pass. Row
//! width consistency is whatever the parser enforces (non-flexible readers
//! reject ragged rows).

use std::io;

use ::csv::ReaderBuilder;
use tracing::debug;

use crate::source::FileSource;

/// Declared MIME types accepted for CSV uploads.
pub const CSV_MIME_TYPES: &[&str] = &["text/csv", "application/csv", "text/comma-separated-values"];

/// Delimiters tried when guessing, in order of preference.
const CANDIDATE_DELIMITERS: &[u8] = b",\t|;";

/// Rows sampled when guessing the delimiter.
const DELIMITER_PREVIEW_ROWS: usize = 10;

/// Result of a CSV check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CsvCheck {
    pub is_valid: bool,
    /// Header fields inferred from the first row.
    pub columns: usize,
    /// Data rows after the header.
    pub records: usize,
}

impl CsvCheck {
    const INVALID: Self = Self {
        is_valid: false,
        columns: 0,
        records: 0,
    };
}

/// Whether the file is declared as CSV, by MIME type or `.csv` extension.
#[must_use]
pub fn is_declared_csv<F: FileSource + ?Sized>(file: &F) -> bool {
    CSV_MIME_TYPES.contains(&file.mime_type()) || file.extension().as_deref() == Some("csv")
}

/// Check an uploaded CSV file.
///
/// # Errors
///
/// Returns the I/O error if the file body cannot be read.
pub async fn check_csv_file<F: FileSource + ?Sized>(file: &F) -> io::Result<CsvCheck> {
    if !is_declared_csv(file) {
        debug!(
            file = file.name(),
            mime_type = file.mime_type(),
            "not declared as CSV"
        );
        return Ok(CsvCheck::INVALID);
    }

    let text = file.read_text().await?;
    Ok(check_csv_text(&text))
}

/// Parse `text` as CSV with a header row.
#[must_use]
pub fn check_csv_text(text: &str) -> CsvCheck {
    if text.trim().is_empty() {
        return CsvCheck::INVALID;
    }

    let delimiter = guess_delimiter(text);
    if let Err(offset) = check_quoting(text.as_bytes(), delimiter) {
        debug!(offset, "CSV quoting is malformed");
        return CsvCheck::INVALID;
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let columns = match reader.headers() {
        Ok(headers) => headers.len(),
        Err(err) => {
            debug!(error = %err, "CSV header row rejected");
            return CsvCheck::INVALID;
        }
    };
    if columns == 0 {
        return CsvCheck::INVALID;
    }

    let mut records = 0;
    for result in reader.records() {
        if let Err(err) = result {
            debug!(error = %err, "CSV row rejected");
            return CsvCheck::INVALID;
        }
        records += 1;
    }

    CsvCheck {
        is_valid: true,
        columns,
        records,
    }
}

/// Quote balance as a strict parser sees it; the `csv` reader itself recovers
/// silently from bad quoting.
///
/// A quote may only open a field, and a closing quote must be followed by the
/// delimiter, a line break or the end of input. `""` inside a quoted field is
/// an escaped quote. On failure, returns the byte offset of the offending quote.
fn check_quoting(bytes: &[u8], delimiter: u8) -> Result<(), usize> {
    let mut in_quotes = false;
    let mut opened_at = 0;
    let mut field_start = true;
    let mut i = 0;

    while let Some(&b) = bytes.get(i) {
        if in_quotes {
            if b == b'"' {
                let next = bytes.get(i + 1).copied();
                if next == Some(b'"') {
                    i += 1;
                } else if next.is_none_or(|n| is_field_end(n, delimiter)) {
                    in_quotes = false;
                } else {
                    return Err(i);
                }
            }
        } else if b == b'"' {
            if !field_start {
                return Err(i);
            }
            in_quotes = true;
            opened_at = i;
        } else {
            field_start = is_field_end(b, delimiter);
            i += 1;
            continue;
        }
        field_start = false;
        i += 1;
    }

    if in_quotes { Err(opened_at) } else { Ok(()) }
}

fn is_field_end(b: u8, delimiter: u8) -> bool {
    b == delimiter || b == b'\n' || b == b'\r'
}

/// Pick the delimiter whose field counts are most consistent over the first rows.
///
/// A candidate must average at least two fields per row. Falls back to `,`.
#[must_use]
pub fn guess_delimiter(text: &str) -> u8 {
    let mut best: Option<(u8, usize)> = None;

    for &delimiter in CANDIDATE_DELIMITERS {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let counts: Vec<usize> = reader
            .records()
            .take(DELIMITER_PREVIEW_ROWS)
            .map_while(Result::ok)
            .map(|record| record.len())
            .collect();
        if counts.is_empty() {
            continue;
        }

        // average field count >= 2, in integer arithmetic
        let total: usize = counts.iter().sum();
        if total < counts.len() * 2 {
            continue;
        }

        let delta: usize = counts.windows(2).map(|w| w[0].abs_diff(w[1])).sum();
        if best.is_none_or(|(_, best_delta)| delta < best_delta) {
            best = Some((delimiter, delta));
        }
    }

    best.map_or(b',', |(delimiter, _)| delimiter)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::source::MemoryFile;

    #[test]
    fn test_simple_csv() {
        let check = check_csv_text("a,b\n1,2");
        assert!(check.is_valid);
        assert_eq!(check.columns, 2);
        assert_eq!(check.records, 1);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let check = check_csv_text("name,age\n\nalice,30\n\nbob,41\n");
        assert!(check.is_valid);
        assert_eq!(check.records, 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(!check_csv_text("a,b,c\n1,2\n").is_valid);
    }

    #[test]
    fn test_blank_text_rejected() {
        assert!(!check_csv_text("").is_valid);
        assert!(!check_csv_text(" \n\t\n").is_valid);
    }

    #[test]
    fn test_single_column_is_valid() {
        let check = check_csv_text("name\nalice\nbob");
        assert!(check.is_valid);
        assert_eq!(check.columns, 1);
    }

    #[test]
    fn test_quoted_fields() {
        let check = check_csv_text("title,body\n\"Hello, world\",\"line one\nline two\"\n");
        assert!(check.is_valid);
        assert_eq!(check.records, 1);
    }

    #[test]
    fn test_unterminated_quote_rejected() {
        assert!(!check_csv_text("a,b\n1,\"2").is_valid);
        assert!(!check_csv_text("a,b\n\"1,2\n3,4\n").is_valid);
    }

    #[test]
    fn test_stray_quote_rejected() {
        assert!(!check_csv_text("a,b\n1,x\"y").is_valid);
        assert!(!check_csv_text("a,b\n\"1\"x,2").is_valid);
    }

    #[test]
    fn test_escaped_quotes_accepted() {
        let check = check_csv_text("a,b\n\"say \"\"hi\"\"\",2\r\n\"\",3");
        assert!(check.is_valid);
        assert_eq!(check.records, 2);
    }

    #[test]
    fn test_check_quoting_offsets() {
        assert_eq!(check_quoting(b"a,b\n1,x\"y", b','), Err(7));
        assert_eq!(check_quoting(b"a,\"b", b','), Err(2));
        assert_eq!(check_quoting(b"a;\"b;c\";d", b';'), Ok(()));
    }

    #[test]
    fn test_guess_delimiter() {
        assert_eq!(guess_delimiter("a,b\n1,2"), b',');
        assert_eq!(guess_delimiter("a;b;c\n1;2;3"), b';');
        assert_eq!(guess_delimiter("a\tb\n1\t2"), b'\t');
        assert_eq!(guess_delimiter("just one column"), b',');
    }

    #[test]
    fn test_semicolon_csv_is_valid() {
        let check = check_csv_text("a;b;c\n1;2;3\n4;5;6");
        assert!(check.is_valid);
        assert_eq!(check.columns, 3);
    }

    #[tokio::test]
    async fn test_declared_type_gate() {
        let ok = MemoryFile::new("data.txt", "application/csv", "a,b\n1,2");
        assert!(check_csv_file(&ok).await.unwrap().is_valid);

        let by_extension = MemoryFile::new("DATA.CSV", "application/octet-stream", "a,b\n1,2");
        assert!(check_csv_file(&by_extension).await.unwrap().is_valid);

        let wrong = MemoryFile::new("data.txt", "text/plain", "a,b\n1,2");
        assert!(!check_csv_file(&wrong).await.unwrap().is_valid);
    }

    #[tokio::test]
    async fn test_empty_file_rejected() {
        let empty = MemoryFile::new("data.csv", "text/csv", Vec::new());
        assert!(!check_csv_file(&empty).await.unwrap().is_valid);
    }
}
