//! US climate-projection and Energy Star tables.

use std::io::Cursor;
use std::path::Path;

use eui_common::{TextEncoding, parse_f64};
use eui_model::columns::{BUILDING_TYPE_INDEX, DECC_BUILDING_TYPE, EUI_PREFIX, US_SECTOR};
use eui_model::{EnergyStarRecord, ProjectionRecord, SourceRow, SourceTable};
use serde::Deserialize;

use crate::error::{IngestError, Result};
use crate::table::{
    column_floats, column_names, column_strings, read_text, read_text_table, require_columns,
};

#[derive(Debug, Deserialize)]
struct ProjectionCsvRow {
    #[serde(rename = "Sector")]
    sector: Option<String>,
    #[serde(rename = "Zone")]
    zone: Option<String>,
    #[serde(rename = "EUI [kWh/m2.yr] (% growth) 2010")]
    eui: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EnergyStarCsvRow {
    #[serde(rename = "Market Sector")]
    market_sector: Option<String>,
    #[serde(rename = "Property type")]
    property_type: Option<String>,
    #[serde(rename = "Site EUI (kBtu/ft2)")]
    site_eui: Option<String>,
}

fn csv_error(path: &Path, err: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Loads the climate-projection table.
///
/// Sector cells are only filled on the first row of each block and are
/// carried forward. EUI cells read like `123.4 (5%)`; only the leading number
/// is kept. Rows without a zone are skipped.
pub fn load_climate_projection(path: &Path) -> Result<Vec<ProjectionRecord>> {
    let text = read_text(path, TextEncoding::Utf8)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(Cursor::new(text.as_bytes()));

    let mut records = Vec::new();
    let mut current_sector: Option<String> = None;
    for result in reader.deserialize::<ProjectionCsvRow>() {
        let row = result.map_err(|e| csv_error(path, &e))?;
        if let Some(sector) = non_empty(row.sector) {
            current_sector = Some(sector);
        }
        let Some(zone) = non_empty(row.zone) else {
            continue;
        };
        let Some(sector) = current_sector.clone() else {
            return Err(IngestError::InvalidValue {
                field: "Sector".to_string(),
                value: String::new(),
                path: path.to_path_buf(),
            });
        };
        let raw = non_empty(row.eui).unwrap_or_default();
        let eui = raw
            .split_whitespace()
            .next()
            .and_then(parse_f64)
            .ok_or_else(|| IngestError::InvalidValue {
                field: "EUI".to_string(),
                value: raw.clone(),
                path: path.to_path_buf(),
            })?;
        records.push(ProjectionRecord { sector, zone, eui });
    }

    tracing::debug!(path = %path.display(), rows = records.len(), "loaded climate projection");
    Ok(records)
}

/// Loads the Energy Star reference table.
pub fn load_energy_star(path: &Path) -> Result<Vec<EnergyStarRecord>> {
    let text = read_text(path, TextEncoding::Utf8)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(Cursor::new(text.as_bytes()));

    let mut records = Vec::new();
    for result in reader.deserialize::<EnergyStarCsvRow>() {
        let row = result.map_err(|e| csv_error(path, &e))?;
        let Some(property_type) = non_empty(row.property_type) else {
            continue;
        };
        let raw_eui = non_empty(row.site_eui);
        let site_eui_kbtu = match raw_eui.as_deref() {
            None => None,
            Some(raw) => Some(parse_f64(raw).ok_or_else(|| IngestError::InvalidValue {
                field: "Site EUI (kBtu/ft2)".to_string(),
                value: raw.to_string(),
                path: path.to_path_buf(),
            })?),
        };
        records.push(EnergyStarRecord {
            market_sector: non_empty(row.market_sector).unwrap_or_default(),
            property_type,
            site_eui_kbtu,
        });
    }

    tracing::debug!(path = %path.display(), rows = records.len(), "loaded Energy Star table");
    Ok(records)
}

/// Loads the climate-adjusted table as mapping input.
///
/// The code is `建物用途序號`, the labels are `建物分類` and `建物用途`, and
/// every `EUI_` column is a metric.
pub fn load_climate_adjusted(path: &Path) -> Result<SourceTable> {
    let df = read_text_table(path, TextEncoding::Utf8)?;
    require_columns(&df, &[BUILDING_TYPE_INDEX, US_SECTOR, DECC_BUILDING_TYPE], path)?;

    let metrics: Vec<String> = column_names(&df)
        .into_iter()
        .filter(|name| name.starts_with(EUI_PREFIX))
        .collect();
    let codes = column_strings(&df, BUILDING_TYPE_INDEX, path)?;
    let sectors = column_strings(&df, US_SECTOR, path)?;
    let types = column_strings(&df, DECC_BUILDING_TYPE, path)?;
    let values = metrics
        .iter()
        .map(|metric| column_floats(&df, metric, path))
        .collect::<Result<Vec<_>>>()?;

    let mut table = SourceTable::new(
        BUILDING_TYPE_INDEX,
        vec![US_SECTOR.to_string(), DECC_BUILDING_TYPE.to_string()],
        metrics,
    );
    for (row_idx, ((code, sector), building_type)) in
        codes.into_iter().zip(sectors).zip(types).enumerate()
    {
        table
            .push(SourceRow {
                code,
                labels: vec![sector, building_type],
                values: values.iter().map(|column| column[row_idx]).collect(),
            })
            .map_err(|source| IngestError::Model {
                path: path.to_path_buf(),
                source,
            })?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_climate_projection_forward_fills_sector() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("proj.csv");
        std::fs::write(
            &path,
            "Sector,Zone,EUI [kWh/m2.yr] (% growth) 2010,EUI 2050\n\
             Commercial,Hot-humid,200.5 (3%),x\n\
             ,Cold-dry,150 (-2%),x\n\
             Residential,Hot-humid,100 (1%),x\n",
        )
        .unwrap();

        let records = load_climate_projection(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].sector, "Commercial");
        assert_eq!(records[1].zone, "Cold-dry");
        assert_eq!(records[0].eui, 200.5);
        assert_eq!(records[2].sector, "Residential");
    }

    #[test]
    fn test_load_climate_projection_bad_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("proj.csv");
        std::fs::write(
            &path,
            "Sector,Zone,EUI [kWh/m2.yr] (% growth) 2010\nCommercial,Hot-dry,n/a\n",
        )
        .unwrap();
        assert!(matches!(
            load_climate_projection(&path),
            Err(IngestError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_energy_star() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("es.csv");
        std::fs::write(
            &path,
            "Market Sector,Property type,Site EUI (kBtu/ft2),Source EUI\n\
             Office,Office,52.9,116.4\n\
             Retail,Strip Mall,,1\n",
        )
        .unwrap();

        let records = load_energy_star(&path).unwrap();
        assert_eq!(records[0].site_eui_kbtu, Some(52.9));
        assert_eq!(records[1].property_type, "Strip Mall");
        assert_eq!(records[1].site_eui_kbtu, None);
    }

    #[test]
    fn test_load_climate_adjusted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("adj.csv");
        std::fs::write(
            &path,
            "\u{feff}建物用途序號,建物分類,建物用途,EUI_溼熱氣候區,EUI_乾冷氣候區\nA1,銀行/金融服務,銀行分行,100.5,80\n",
        )
        .unwrap();

        let table = load_climate_adjusted(&path).unwrap();
        assert_eq!(table.metrics, vec!["EUI_溼熱氣候區", "EUI_乾冷氣候區"]);
        assert_eq!(table.rows[0].code, "A1");
        assert_eq!(table.rows[0].values, vec![Some(100.5), Some(80.0)]);
    }
}
