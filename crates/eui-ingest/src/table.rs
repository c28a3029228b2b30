//! Encoding-aware CSV reading.
//!
//! Every source table is decoded to UTF-8 first and then parsed with every
//! column read as text. Numeric parsing happens per column in the loaders so
//! that codes like `05` or `A1` survive untouched.

use std::io::Cursor;
use std::path::Path;

use eui_common::{TextEncoding, any_to_f64, any_to_string};
use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Reads a file into memory, mapping I/O errors to the offending path.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Reads and decodes a text file.
///
/// Malformed byte sequences are replaced and reported with a warning.
pub fn read_text(path: &Path, encoding: TextEncoding) -> Result<String> {
    let bytes = read_bytes(path)?;
    let (text, had_errors) = encoding.decode(&bytes);
    if had_errors {
        tracing::warn!(
            path = %path.display(),
            encoding = %encoding,
            "replaced malformed byte sequences while decoding"
        );
    }
    Ok(text.into_owned())
}

/// Parses CSV text into a DataFrame whose columns are all strings.
pub fn parse_text_table(text: String, path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Reads a CSV file in the given encoding.
pub fn read_text_table(path: &Path, encoding: TextEncoding) -> Result<DataFrame> {
    let text = read_text(path, encoding)?;
    let df = parse_text_table(text, path)?;
    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded table"
    );
    Ok(df)
}

/// Fails with [`IngestError::MissingColumn`] for the first absent column.
pub fn require_columns(df: &DataFrame, columns: &[&str], path: &Path) -> Result<()> {
    let names = df.get_column_names();
    for column in columns {
        if !names.iter().any(|name| name.as_str() == *column) {
            return Err(IngestError::MissingColumn {
                column: (*column).to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Column values as trimmed strings; nulls become empty strings.
pub fn column_strings(df: &DataFrame, name: &str, path: &Path) -> Result<Vec<String>> {
    let column = df.column(name).map_err(|_| IngestError::MissingColumn {
        column: name.to_string(),
        path: path.to_path_buf(),
    })?;
    let mut values = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        values.push(any_to_string(column.get(idx)?).trim().to_string());
    }
    Ok(values)
}

/// Column values parsed as numbers; empty and `nan` cells become `None`.
///
/// Non-empty text that is not a number is an error.
pub fn column_floats(df: &DataFrame, name: &str, path: &Path) -> Result<Vec<Option<f64>>> {
    let column = df.column(name).map_err(|_| IngestError::MissingColumn {
        column: name.to_string(),
        path: path.to_path_buf(),
    })?;
    let mut values = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        let value = column.get(idx)?;
        let parsed = any_to_f64(value.clone());
        if parsed.is_none() {
            let text = any_to_string(value);
            let trimmed = text.trim();
            if !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("nan") {
                return Err(IngestError::InvalidValue {
                    field: name.to_string(),
                    value: trimmed.to_string(),
                    path: path.to_path_buf(),
                });
            }
        }
        values.push(parsed);
    }
    Ok(values)
}

/// Column names in file order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_table_keeps_codes_as_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "\u{feff}擔保品細項,EUI_Mean\n05,12.5\n10,\n").unwrap();

        let df = read_text_table(&path, TextEncoding::Utf8).unwrap();
        assert_eq!(column_names(&df), vec!["擔保品細項", "EUI_Mean"]);
        assert_eq!(
            column_strings(&df, "擔保品細項", &path).unwrap(),
            vec!["05", "10"]
        );
        assert_eq!(
            column_floats(&df, "EUI_Mean", &path).unwrap(),
            vec![Some(12.5), None]
        );
    }

    #[test]
    fn test_read_text_table_shift_jis() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sjis.csv");
        let (bytes, _) = TextEncoding::ShiftJis.encode("建物用途,電力_年合計(kWh/㎡・年)\n事務所,100\n");
        std::fs::write(&path, bytes).unwrap();

        let df = read_text_table(&path, TextEncoding::ShiftJis).unwrap();
        assert!(require_columns(&df, &["建物用途", "電力_年合計(kWh/㎡・年)"], &path).is_ok());
        assert_eq!(
            column_strings(&df, "建物用途", &path).unwrap(),
            vec!["事務所"]
        );
    }

    #[test]
    fn test_require_columns_reports_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();
        let df = read_text_table(&path, TextEncoding::Utf8).unwrap();
        let err = require_columns(&df, &["a", "c"], &path).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { column, .. } if column == "c"));
    }

    #[test]
    fn test_column_floats_rejects_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "v\n1\nabc\n").unwrap();
        let df = read_text_table(&path, TextEncoding::Utf8).unwrap();
        assert!(matches!(
            column_floats(&df, "v", &path),
            Err(IngestError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = read_text_table(Path::new("/nonexistent/x.csv"), TextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }
}
