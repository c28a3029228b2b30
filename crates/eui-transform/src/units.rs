//! Unit conversion of survey metrics.

use eui_model::ObservationTable;

use crate::error::{Result, TransformError};

/// MJ to kWh.
pub const MJ_TO_KWH: f64 = 0.2778;

/// kBtu/ft² to kWh/m².
pub const KBTU_PER_FT2_TO_KWH_PER_M2: f64 = 3.15459;

/// Multiplies one metric by `factor` and renames it.
pub fn convert_metric(
    table: &mut ObservationTable,
    metric: &str,
    factor: f64,
    renamed: &str,
) -> Result<()> {
    let index = table
        .metric_index(metric)
        .ok_or_else(|| TransformError::MissingMetric {
            metric: metric.to_string(),
        })?;
    for row in &mut table.rows {
        if let Some(value) = row.values[index].as_mut() {
            *value *= factor;
        }
    }
    table.metrics[index] = renamed.to_string();
    Ok(())
}

/// Renames one metric without touching its values.
pub fn rename_metric(table: &mut ObservationTable, metric: &str, renamed: &str) -> Result<()> {
    convert_metric(table, metric, 1.0, renamed)
}
