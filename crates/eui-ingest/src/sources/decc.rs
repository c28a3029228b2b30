//! DECC survey tables.

use std::path::Path;

use eui_common::TextEncoding;
use eui_model::columns::{
    BUILDING_TYPE_INDEX, DECC_BUILDING_TYPE, DECC_ELECTRICITY, DECC_ELECTRICITY_SOURCE,
    DECC_IDENTIFIER, DECC_PRIMARY_ENERGY_SOURCE, MEAN_PREFIX, eui_column,
};
use eui_model::{
    ObservationTable, RawObservation, RegionBucket, SourceRow, SourceTable, normalize_code,
};

use crate::error::{IngestError, Result};
use crate::table::{column_floats, column_strings, read_text_table, require_columns};

/// Loads the raw per-building survey table.
///
/// Metrics keep their source names: electricity in kWh and primary energy
/// in MJ. Rows are not filtered here.
pub fn load_decc_observations(path: &Path, encoding: TextEncoding) -> Result<ObservationTable> {
    let df = read_text_table(path, encoding)?;
    require_columns(
        &df,
        &[
            DECC_BUILDING_TYPE,
            DECC_IDENTIFIER,
            DECC_ELECTRICITY_SOURCE,
            DECC_PRIMARY_ENERGY_SOURCE,
        ],
        path,
    )?;

    let types = column_strings(&df, DECC_BUILDING_TYPE, path)?;
    let ids = column_strings(&df, DECC_IDENTIFIER, path)?;
    let electricity = column_floats(&df, DECC_ELECTRICITY_SOURCE, path)?;
    let primary = column_floats(&df, DECC_PRIMARY_ENERGY_SOURCE, path)?;

    let mut table = ObservationTable::new(vec![
        DECC_ELECTRICITY_SOURCE.to_string(),
        DECC_PRIMARY_ENERGY_SOURCE.to_string(),
    ]);
    for (((building_type, identifier), elec), prim) in
        types.into_iter().zip(ids).zip(electricity).zip(primary)
    {
        table
            .push(RawObservation::new(building_type, identifier, vec![elec, prim]))
            .map_err(|source| IngestError::Model {
                path: path.to_path_buf(),
                source,
            })?;
    }

    tracing::info!(path = %path.display(), rows = table.len(), "loaded DECC survey");
    Ok(table)
}

/// Loads the electricity means of the grouped DECC table as mapping input.
///
/// Columns `Mean_電力年合計(kWh/㎡・年)_<bucket>` become `EUI_<region>`. The
/// source code is the `建物用途序號` index; tables written without it are
/// numbered 1..n in row order.
pub fn load_decc_region_means(path: &Path) -> Result<SourceTable> {
    let df = read_text_table(path, TextEncoding::Utf8)?;
    require_columns(&df, &[DECC_BUILDING_TYPE], path)?;

    let labels = column_strings(&df, DECC_BUILDING_TYPE, path)?;
    let codes = if df.column(BUILDING_TYPE_INDEX).is_ok() {
        column_strings(&df, BUILDING_TYPE_INDEX, path)?
            .iter()
            .map(|code| normalize_code(code))
            .collect()
    } else {
        tracing::debug!(path = %path.display(), "no index column, numbering rows");
        (1..=labels.len()).map(|i| i.to_string()).collect::<Vec<_>>()
    };

    let mut metrics = Vec::with_capacity(RegionBucket::ALL.len());
    let mut columns = Vec::with_capacity(RegionBucket::ALL.len());
    for bucket in RegionBucket::ALL {
        let source = format!("{MEAN_PREFIX}{DECC_ELECTRICITY}_{bucket}");
        columns.push(column_floats(&df, &source, path)?);
        metrics.push(eui_column(bucket.region_name()));
    }

    let mut table = SourceTable::new(
        BUILDING_TYPE_INDEX,
        vec![DECC_BUILDING_TYPE.to_string()],
        metrics,
    );
    for (row_idx, (code, label)) in codes.into_iter().zip(labels).enumerate() {
        let values = columns.iter().map(|column| column[row_idx]).collect();
        table
            .push(SourceRow {
                code,
                labels: vec![label],
                values,
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
    fn test_load_decc_observations_shift_jis() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("DECC.csv");
        let text = "建物ID,建物用途,電力_年合計(kWh/㎡・年),一次エネルギー原単位_MJ/㎡・年\n\
                    A001,事務所,100,1000\n\
                    Z002,病院,,2000\n";
        let (bytes, _) = TextEncoding::ShiftJis.encode(text);
        std::fs::write(&path, bytes).unwrap();

        let table = load_decc_observations(&path, TextEncoding::ShiftJis).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].building_type, "事務所");
        assert_eq!(table.rows[0].values, vec![Some(100.0), Some(1000.0)]);
        assert_eq!(table.rows[1].values, vec![None, Some(2000.0)]);
    }

    #[test]
    fn test_load_decc_region_means() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("means.csv");
        let mut header = vec!["建物用途序號".to_string(), "建物用途".to_string()];
        let mut row = vec!["1".to_string(), "辦公室".to_string()];
        for bucket in RegionBucket::ALL {
            header.push(format!("Mean_電力年合計(kWh/㎡・年)_{bucket}"));
            row.push(format!("{}", bucket.letter() as u32 - 'A' as u32));
        }
        header.push("nSample_電力年合計(kWh/㎡・年)_A".to_string());
        row.push("3".to_string());
        std::fs::write(&path, format!("\u{feff}{}\n{}\n", header.join(","), row.join(","))).unwrap();

        let table = load_decc_region_means(&path).unwrap();
        assert_eq!(table.metrics[0], "EUI_北海道");
        assert_eq!(table.metrics[7], "EUI_九州");
        assert_eq!(table.rows[0].code, "1");
        assert_eq!(table.rows[0].labels, vec!["辦公室".to_string()]);
        assert_eq!(table.rows[0].values[3], Some(3.0));
    }

    #[test]
    fn test_load_decc_region_means_missing_bucket() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("means.csv");
        std::fs::write(&path, "建物用途,Mean_電力年合計(kWh/㎡・年)_A\n辦公室,1\n").unwrap();
        assert!(matches!(
            load_decc_region_means(&path),
            Err(IngestError::MissingColumn { .. })
        ));
    }
}
