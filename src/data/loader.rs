use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::Path;

use super::model::{Column, Table};
use crate::error::{FormatError, PipelineError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a delimited file into a table of raw text columns.
///
/// The header row names the columns; every following record contributes
/// one value to each column.  Rows are kept in file order and none are
/// dropped.  The file handle lives only for the duration of this call.
pub fn load_csv(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|error| PipelineError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    let table = read_table(file)?;
    log::info!("Loaded {} from {}", table, path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Read CSV text from any reader.  Width checking is done here rather than
/// by the `csv` crate so the error can carry the data row index.
pub fn read_table<R: io::Read>(reader: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|error| FormatError::Csv { row: 0, error })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        return Err(FormatError::MissingHeader.into());
    }
    let mut seen = BTreeSet::new();
    for h in &headers {
        if !seen.insert(h.as_str()) {
            return Err(FormatError::DuplicateHeader(h.clone()).into());
        }
    }
    log::debug!("CSV header: {headers:?}");

    let mut values: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    let mut n_rows = 0;

    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|error| FormatError::Csv { row, error })?;

        if record.len() != headers.len() {
            let line = record.position().map_or(0, |p| p.line());
            return Err(FormatError::RowWidth {
                row,
                line,
                expected: headers.len(),
                found: record.len(),
            }
            .into());
        }

        for (col, field) in values.iter_mut().zip(record.iter()) {
            col.push(field.to_string());
        }
        n_rows += 1;
    }

    let mut table = Table::with_rows(n_rows);
    for (name, col) in headers.into_iter().zip(values) {
        table.push(name, Column::Raw(col))?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_columns_in_file_order() {
        let text = "Date,AveragePrice,region\n2015-12-27,1.33,Albany\n2015-12-20,1.35,Atlanta\n";
        let table = read_table(text.as_bytes()).unwrap();

        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column_names(), ["Date", "AveragePrice", "region"]);
        assert_eq!(
            table.get("region"),
            Some(&Column::Raw(vec!["Albany".into(), "Atlanta".into()]))
        );
    }

    #[test]
    fn unnamed_index_column_is_kept() {
        let text = ",Date\n0,2015-12-27\n1,2015-12-20\n";
        let table = read_table(text.as_bytes()).unwrap();
        assert_eq!(table.column_names(), ["", "Date"]);
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn header_only_gives_empty_table() {
        let table = read_table("a,b\n".as_bytes()).unwrap();
        assert_eq!(table.n_rows(), 0);
        assert_eq!(table.n_columns(), 2);
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = read_table("".as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::Format(FormatError::MissingHeader)));
    }

    #[test]
    fn short_row_reports_row_index() {
        let text = "a,b,c\n1,2,3\n4,5,6\n7,8\n";
        let err = read_table(text.as_bytes()).unwrap_err();
        match err {
            PipelineError::Format(FormatError::RowWidth {
                row,
                line,
                expected,
                found,
            }) => {
                assert_eq!(row, 2);
                assert_eq!(line, 4);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn long_row_is_rejected() {
        let err = read_table("a\n1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Format(FormatError::RowWidth { row: 0, found: 2, .. })
        ));
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let err = read_table("a,a\n1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::Format(FormatError::DuplicateHeader(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_csv(Path::new("/nonexistent/avocado.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
        assert!(err.to_string().starts_with("load:"));
    }

    #[test]
    fn loads_from_disk() {
        let path = std::env::temp_dir().join(format!("avocado-ols-loader-{}.csv", std::process::id()));
        std::fs::write(&path, "x,y\n1,2\n3,4\n").unwrap();
        let table = load_csv(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(table.n_rows(), 2);
    }
}
