//! Read-back of mapping outputs written by earlier stages.

use std::path::Path;

use eui_common::TextEncoding;
use eui_model::columns::EUI_PREFIX;
use eui_model::{AGGREGATE_LABEL, ClassifiedRow, ClassifiedTable, RowKind};

use crate::error::Result;
use crate::table::{
    column_floats, column_names, column_strings, read_text_table, require_columns,
};

/// Loads a classified table written by a mapping stage.
///
/// Rows whose first source label is [`AGGREGATE_LABEL`] are summary rows:
/// placeholders when every value is missing, aggregates otherwise.
pub fn load_classified_table(
    path: &Path,
    code_column: &str,
    label_column: &str,
    source_label_columns: &[&str],
) -> Result<ClassifiedTable> {
    let df = read_text_table(path, TextEncoding::Utf8)?;
    let mut required = vec![code_column, label_column];
    required.extend_from_slice(source_label_columns);
    require_columns(&df, &required, path)?;

    let metrics: Vec<String> = column_names(&df)
        .into_iter()
        .filter(|name| name.starts_with(EUI_PREFIX))
        .collect();
    let codes = column_strings(&df, code_column, path)?;
    let labels = column_strings(&df, label_column, path)?;
    let source_labels = source_label_columns
        .iter()
        .map(|column| column_strings(&df, column, path))
        .collect::<Result<Vec<_>>>()?;
    let values = metrics
        .iter()
        .map(|metric| column_floats(&df, metric, path))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(codes.len());
    for (row_idx, (code, label)) in codes.into_iter().zip(labels).enumerate() {
        let row_source_labels: Vec<String> = source_labels
            .iter()
            .map(|column| column[row_idx].clone())
            .collect();
        let row_values: Vec<Option<f64>> = values.iter().map(|column| column[row_idx]).collect();
        let is_summary = row_source_labels
            .first()
            .is_some_and(|label| label == AGGREGATE_LABEL);
        let kind = match (is_summary, row_values.iter().all(Option::is_none)) {
            (true, true) => RowKind::Placeholder,
            (true, false) => RowKind::Aggregate,
            (false, _) => RowKind::Detail,
        };
        rows.push(ClassifiedRow {
            code,
            label,
            kind,
            source_labels: row_source_labels,
            values: row_values,
        });
    }

    Ok(ClassifiedTable {
        code_column: code_column.to_string(),
        label_column: label_column.to_string(),
        source_label_columns: source_label_columns.iter().map(|c| (*c).to_string()).collect(),
        metrics,
        rows,
    })
}
