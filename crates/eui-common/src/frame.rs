//! DataFrame construction and CSV serialisation.

use polars::prelude::*;

use crate::encoding::TextEncoding;

/// Builds a text column.
pub fn string_column(name: &str, values: Vec<String>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Builds a nullable text column. `None` is written as an empty cell, an
/// empty string as `""`.
pub fn optional_string_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Builds a nullable float column. `None` is written as an empty cell.
pub fn float_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Serialises a frame as CSV in the requested encoding.
///
/// Characters the target encoding cannot represent are replaced with HTML
/// numeric character references by the encoder; the returned flag reports
/// whether that happened.
pub fn frame_to_csv_bytes(
    df: &mut DataFrame,
    encoding: TextEncoding,
) -> PolarsResult<(Vec<u8>, bool)> {
    let mut buffer: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(df)?;
    let text = String::from_utf8(buffer)
        .map_err(|e| PolarsError::ComputeError(format!("CSV output is not UTF-8: {e}").into()))?;
    Ok(encoding.encode(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_csv_bytes_writes_nulls_as_empty() {
        let mut df = DataFrame::new(vec![
            string_column("code", vec!["01".to_string(), "02".to_string()]),
            float_column("EUI_關東", vec![Some(12.5), None]),
        ])
        .unwrap();

        let (bytes, lossy) = frame_to_csv_bytes(&mut df, TextEncoding::Utf8).unwrap();
        assert!(!lossy);
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "code,EUI_關東\n01,12.5\n02,\n");
    }

    #[test]
    fn test_missing_text_is_an_empty_cell() {
        let mut df = DataFrame::new(vec![
            string_column("COUNTRY", vec!["FR-France".to_string(), "US-美國".to_string()]),
            optional_string_column("CLIMATEZONE", vec![None, Some("4A".to_string())]),
            float_column("EUI_01", vec![None, Some(80.5)]),
        ])
        .unwrap();

        let (bytes, _) = frame_to_csv_bytes(&mut df, TextEncoding::Utf8).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "COUNTRY,CLIMATEZONE,EUI_01\nFR-France,,\nUS-美國,4A,80.5\n");
    }

    #[test]
    fn test_frame_to_csv_bytes_bom() {
        let mut df = DataFrame::new(vec![string_column("a", vec!["x".to_string()])]).unwrap();
        let (bytes, _) = frame_to_csv_bytes(&mut df, TextEncoding::Utf8Bom).unwrap();
        assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    }
}
