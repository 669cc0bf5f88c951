use crate::error::{LeaderboardError, Result};
use crate::types::{Cell, RawRow};
use crate::util::coerce_field;
use csv::ReaderBuilder;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// A record that could not be parsed. The row is skipped, the load goes on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub line: u64,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Non-empty records seen after the header.
    pub total_rows: usize,
    /// Records with every field blank.
    pub blank_rows: usize,
    /// Rows dropped because name or team was missing.
    pub missing_identity: usize,
    /// Rows that became member records.
    pub loaded_rows: usize,
    pub parse_errors: Vec<RowError>,
}

impl LoadReport {
    pub fn skipped_rows(&self) -> usize {
        self.blank_rows + self.missing_identity + self.parse_errors.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    pub report: LoadReport,
}

/// Parse delimited text whose first line is the header.
pub fn parse_text(text: &str) -> Result<ParsedTable> {
    parse_bytes(text.as_bytes())
}

/// Parse raw file contents whose first line is the header.
///
/// Empty lines are ignored. A record with the wrong number of fields (or
/// invalid UTF-8) is reported in `report.parse_errors` and skipped. Only a
/// header that cannot be read fails the whole parse.
pub fn parse_bytes(bytes: &[u8]) -> Result<ParsedTable> {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let mut report = LoadReport::default();
    let mut rows: Vec<RawRow> = Vec::new();

    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                warn!(line, error = %e, "skipping malformed row");
                report.total_rows += 1;
                report.parse_errors.push(RowError {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };
        report.total_rows += 1;
        let cells: Vec<Cell> = record.iter().map(coerce_field).collect();
        if cells.iter().all(Cell::is_empty) {
            report.blank_rows += 1;
            continue;
        }
        rows.push(RawRow {
            line: record.position().map(|p| p.line()).unwrap_or(0),
            cells,
        });
    }

    Ok(ParsedTable {
        headers,
        rows,
        report,
    })
}

/// Read the whole source file, then parse it. A missing or unreadable file
/// is fatal for the load; bad encoding only costs the affected rows.
pub fn load_from_path(path: &Path) -> Result<ParsedTable> {
    let bytes = std::fs::read(path).map_err(|source| LeaderboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_bytes(&bytes)?;
    info!(
        path = %path.display(),
        rows = table.rows.len(),
        errors = table.report.parse_errors.len(),
        "parsed leaderboard file"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_defines_fields_and_values_are_typed() {
        let table = parse_text("Name,Team Name,1/1\nAlice,TeamA,10\n").unwrap();
        assert_eq!(table.headers, vec!["Name", "Team Name", "1/1"]);
        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.line, 2);
        assert_eq!(row.get(0).as_text(), Some("Alice"));
        assert_eq!(row.get(2).as_score(), 10.0);
    }

    #[test]
    fn empty_lines_and_blank_rows_are_ignored() {
        let text = "Name,Team Name,1/1\n\nAlice,TeamA,10\n,,\n\nBob,TeamB,3\n";
        let table = parse_text(text).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.report.blank_rows, 1);
        assert!(table.report.parse_errors.is_empty());
    }

    #[test]
    fn malformed_row_is_reported_and_skipped() {
        let text = "Name,Team Name,1/1\nAlice,TeamA,10\nBroken,Row\nBob,TeamB,3\n";
        let table = parse_text(text).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.report.parse_errors.len(), 1);
        assert_eq!(table.report.parse_errors[0].line, 3);
        assert_eq!(table.rows[1].get(0).as_text(), Some("Bob"));
    }

    #[test]
    fn byte_order_mark_is_stripped() {
        let table = parse_text("\u{feff}Name,Team Name\nAlice,TeamA\n").unwrap();
        assert_eq!(table.headers[0], "Name");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_from_path(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LeaderboardError::Io { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.csv");
        std::fs::write(&path, "Name,Team Name,1/1\nAlice,TeamA,7\n").unwrap();
        let table = load_from_path(&path).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn latin1_row_is_reported_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.csv");
        std::fs::write(
            &path,
            b"Name,Team Name,1/1\nAlice,TeamA,10\nJos\xe9,TeamA,5\nBob,TeamB,3\n",
        )
        .unwrap();
        let table = load_from_path(&path).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.report.parse_errors.len(), 1);
        assert_eq!(table.report.total_rows, 3);
        assert_eq!(table.rows[0].get(0).as_text(), Some("Alice"));
        assert_eq!(table.rows[1].get(0).as_text(), Some("Bob"));
    }
}
