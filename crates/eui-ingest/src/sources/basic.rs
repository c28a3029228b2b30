//! Reference tables of the basic coefficient method.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use eui_common::{TextEncoding, parse_f64};
use eui_model::columns::EUI_MEAN;
use eui_model::{normalize_code, normalize_collateral_code};
use serde::Deserialize;

use crate::error::{IngestError, Result};
use crate::table::{
    column_floats, column_names, column_strings, read_text, read_text_table, require_columns,
};

#[derive(Debug, Deserialize)]
struct CarbonIntensityRow {
    #[serde(rename = "國家/地區代號")]
    iso: Option<String>,
    #[serde(rename = "電力排碳係數_公斤CO2e/度")]
    coefficient: Option<String>,
}

/// Loads electricity carbon-intensity coefficients keyed by ISO code.
///
/// Duplicate codes keep the first coefficient.
pub fn load_carbon_intensity(path: &Path) -> Result<BTreeMap<String, Option<f64>>> {
    let text = read_text(path, TextEncoding::Utf8)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(Cursor::new(text.as_bytes()));

    let mut coefficients = BTreeMap::new();
    for result in reader.deserialize::<CarbonIntensityRow>() {
        let row = result.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let Some(iso) = row.iso.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
            continue;
        };
        let coefficient = row.coefficient.as_deref().and_then(parse_f64);
        coefficients.entry(iso).or_insert(coefficient);
    }

    tracing::debug!(
        path = %path.display(),
        countries = coefficients.len(),
        "loaded carbon intensity coefficients"
    );
    Ok(coefficients)
}

/// Loads `(code, EUI_Mean)` pairs of an EEWH reference table in file order.
///
/// Collateral codes are zero-padded to two digits.
pub fn load_eewh_means(
    path: &Path,
    code_column: &str,
    collateral: bool,
) -> Result<Vec<(String, Option<f64>)>> {
    let df = read_text_table(path, TextEncoding::Utf8)?;
    require_columns(&df, &[code_column, EUI_MEAN], path)?;

    let codes = column_strings(&df, code_column, path)?;
    let values = column_floats(&df, EUI_MEAN, path)?;
    Ok(codes
        .into_iter()
        .zip(values)
        .filter(|(code, _)| !code.is_empty())
        .map(|(code, value)| {
            let code = if collateral {
                normalize_collateral_code(&code)
            } else {
                normalize_code(&code)
            };
            (code, value)
        })
        .collect())
}

/// Values of the last column of a table, in row order.
pub fn load_last_column(path: &Path) -> Result<Vec<Option<f64>>> {
    let df = read_text_table(path, TextEncoding::Utf8)?;
    let Some(last) = column_names(&df).pop() else {
        return Err(IngestError::CsvParse {
            path: path.to_path_buf(),
            message: "table has no columns".to_string(),
        });
    };
    column_floats(&df, &last, path)
}
