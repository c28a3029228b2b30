//! Hierarchical mapping onto bank classification codes.
//!
//! One pass turns a [`SourceTable`] into a [`ClassifiedTable`] by applying
//! each [`MappingRule`] in order:
//!
//! | Rule source      | Matches | Output rows                                  |
//! |------------------|---------|----------------------------------------------|
//! | none             | -       | placeholder                                  |
//! | single code      | ≥ 1     | aggregate                                    |
//! | list of codes    | ≥ 1     | aggregate, then one detail row per match     |
//! | single or list   | 0       | placeholder                                  |
//!
//! Aggregates are the unweighted mean of the matched rows, per metric.
//! Chaining passes goes through [`ClassifiedTable::into_source`], which keeps
//! only aggregate and placeholder rows.

use eui_common::mean_of;
use eui_model::{
    AGGREGATE_LABEL, ClassifiedRow, ClassifiedTable, MappingRule, RowKind, SourceRow,
    SourceSpec, SourceTable,
};

/// Column names of a pass's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetColumns<'a> {
    pub code: &'a str,
    pub label: &'a str,
}

/// Applies `rules` to `source`, producing one block of rows per rule.
pub fn map_pass(
    source: &SourceTable,
    rules: &[MappingRule],
    target: TargetColumns<'_>,
) -> ClassifiedTable {
    let mut rows = Vec::new();
    for rule in rules {
        let matched: Vec<&SourceRow> = match &rule.sources {
            SourceSpec::Unmapped => Vec::new(),
            SourceSpec::Single(code) => source.rows_with_code(code).collect(),
            SourceSpec::List(codes) => source
                .rows
                .iter()
                .filter(|row| codes.contains(&row.code))
                .collect(),
        };

        for code in rule.sources.codes() {
            if !matched.iter().any(|row| row.code == *code) {
                tracing::warn!(
                    target_code = %rule.target_code,
                    source_code = %code,
                    "mapping source code not found"
                );
            }
        }

        if matched.is_empty() {
            let empty = vec![None; source.metrics.len()];
            rows.push(summary_row(rule, RowKind::Placeholder, source, empty));
            continue;
        }

        let means = (0..source.metrics.len())
            .map(|m| mean_of(matched.iter().map(|row| row.values[m])))
            .collect();
        rows.push(summary_row(rule, RowKind::Aggregate, source, means));

        if matches!(rule.sources, SourceSpec::List(_)) {
            rows.extend(matched.into_iter().map(|row| ClassifiedRow {
                code: rule.target_code.clone(),
                label: rule.target_label.clone(),
                kind: RowKind::Detail,
                source_labels: row.labels.clone(),
                values: row.values.clone(),
            }));
        }
    }

    let placeholders = rows.iter().filter(|r| r.kind == RowKind::Placeholder).count();
    tracing::debug!(
        rules = rules.len(),
        rows = rows.len(),
        placeholders,
        "mapped source table"
    );

    ClassifiedTable {
        code_column: target.code.to_string(),
        label_column: target.label.to_string(),
        source_label_columns: source.label_columns.clone(),
        metrics: source.metrics.clone(),
        rows,
    }
}

fn summary_row(
    rule: &MappingRule,
    kind: RowKind,
    source: &SourceTable,
    values: Vec<Option<f64>>,
) -> ClassifiedRow {
    ClassifiedRow {
        code: rule.target_code.clone(),
        label: rule.target_label.clone(),
        kind,
        source_labels: vec![AGGREGATE_LABEL.to_string(); source.label_columns.len()],
        values,
    }
}
