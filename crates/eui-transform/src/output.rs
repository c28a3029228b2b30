//! DataFrames of the tables written by each stage.
//!
//! Values are kept at full precision in memory and rounded here, at write
//! time, so chained passes never compound rounding.

use std::fmt;
use std::str::FromStr;

use eui_common::{float_column, round_option, string_column};
use eui_model::columns::{BUILDING_TYPE_INDEX, COUNT_PREFIX, DECC_BUILDING_TYPE, MEAN_PREFIX};
use eui_model::labels::{DECC_BUILDING_TYPES, translate};
use eui_model::{ClassifiedTable, GroupTable, SourceTable};
use polars::prelude::*;

use crate::error::Result;

/// Language of the grouped DECC output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputLanguage {
    /// Building types translated, `建物用途序號` index added.
    #[default]
    Chinese,
    /// Building types as surveyed, no index.
    Japanese,
}

impl OutputLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chinese => "chinese",
            Self::Japanese => "japanese",
        }
    }
}

impl fmt::Display for OutputLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputLanguage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chinese" | "zh" => Ok(Self::Chinese),
            "japanese" | "ja" => Ok(Self::Japanese),
            other => Err(format!("unsupported output language '{other}'")),
        }
    }
}

fn rounded(values: impl IntoIterator<Item = Option<f64>>, digits: u32) -> Vec<Option<f64>> {
    values
        .into_iter()
        .map(|value| round_option(value, digits))
        .collect()
}

/// Grouped statistics: `建物用途`, `Mean_<metric>_<bucket>`…, `nSample_<metric>_<bucket>`….
///
/// Metric blocks are ordered by metric name, so primary energy precedes
/// electricity.
pub fn group_table_frame(
    table: &GroupTable,
    language: OutputLanguage,
    digits: u32,
) -> Result<DataFrame> {
    let mut columns = Vec::new();
    if language == OutputLanguage::Chinese {
        let index: Vec<u32> = (1..=table.rows.len() as u32).collect();
        columns.push(Series::new(BUILDING_TYPE_INDEX.into(), index).into_column());
    }
    let types = table
        .rows
        .iter()
        .map(|row| match language {
            OutputLanguage::Chinese => {
                translate(&DECC_BUILDING_TYPES, &row.building_type).to_string()
            }
            OutputLanguage::Japanese => row.building_type.clone(),
        })
        .collect();
    columns.push(string_column(DECC_BUILDING_TYPE, types));

    let mut order: Vec<(usize, &String)> = table.metrics.iter().enumerate().collect();
    order.sort_by(|a, b| a.1.cmp(b.1));

    for &(m, metric) in &order {
        for (b, bucket) in table.buckets.iter().enumerate() {
            let name = format!("{MEAN_PREFIX}{metric}_{bucket}");
            let values = rounded(table.rows.iter().map(|row| row.stats[m][b].mean), digits);
            columns.push(float_column(&name, values));
        }
    }
    for &(m, metric) in &order {
        for (b, bucket) in table.buckets.iter().enumerate() {
            let name = format!("{COUNT_PREFIX}{metric}_{bucket}");
            let counts: Vec<Option<u32>> = table
                .rows
                .iter()
                .map(|row| row.stats[m][b].count.map(|c| c as u32))
                .collect();
            columns.push(Series::new(name.as_str().into(), counts).into_column());
        }
    }
    Ok(DataFrame::new(columns)?)
}

/// Mapping output: code, label, source labels, then metrics.
pub fn classified_frame(table: &ClassifiedTable, digits: u32) -> Result<DataFrame> {
    let codes = table.rows.iter().map(|r| r.code.clone()).collect();
    let labels = table.rows.iter().map(|r| r.label.clone()).collect();
    let mut columns = vec![
        string_column(&table.code_column, codes),
        string_column(&table.label_column, labels),
    ];
    for (i, name) in table.source_label_columns.iter().enumerate() {
        let labels = table
            .rows
            .iter()
            .map(|r| r.source_labels.get(i).cloned().unwrap_or_default())
            .collect();
        columns.push(string_column(name, labels));
    }
    for (m, metric) in table.metrics.iter().enumerate() {
        let values = rounded(table.rows.iter().map(|r| r.values[m]), digits);
        columns.push(float_column(metric, values));
    }
    Ok(DataFrame::new(columns)?)
}

/// Source table: code, labels, then metrics.
pub fn source_table_frame(table: &SourceTable, digits: u32) -> Result<DataFrame> {
    let mut columns = vec![string_column(
        &table.code_column,
        table.rows.iter().map(|r| r.code.clone()).collect(),
    )];
    for (i, name) in table.label_columns.iter().enumerate() {
        let labels = table.rows.iter().map(|r| r.labels[i].clone()).collect();
        columns.push(string_column(name, labels));
    }
    for (m, metric) in table.metrics.iter().enumerate() {
        let values = rounded(table.rows.iter().map(|r| r.values[m]), digits);
        columns.push(float_column(metric, values));
    }
    Ok(DataFrame::new(columns)?)
}
