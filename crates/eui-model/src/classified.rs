//! Classification tables produced by hierarchical mapping.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Label written in place of source labels on aggregate and placeholder rows.
pub const AGGREGATE_LABEL: &str = "全部平均";

/// Input row of a mapping pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub code: String,
    /// One entry per label column of the owning table.
    pub labels: Vec<String>,
    /// One entry per metric of the owning table.
    pub values: Vec<Option<f64>>,
}

/// Input table of a mapping pass: coded rows with labels and metric values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    pub code_column: String,
    pub label_columns: Vec<String>,
    pub metrics: Vec<String>,
    pub rows: Vec<SourceRow>,
}

impl SourceTable {
    pub fn new(code_column: impl Into<String>, label_columns: Vec<String>, metrics: Vec<String>) -> Self {
        Self {
            code_column: code_column.into(),
            label_columns,
            metrics,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: SourceRow) -> Result<()> {
        if row.values.len() != self.metrics.len() {
            return Err(ModelError::ShapeMismatch {
                key: row.code,
                expected: self.metrics.len(),
                actual: row.values.len(),
            });
        }
        if row.labels.len() != self.label_columns.len() {
            return Err(ModelError::ShapeMismatch {
                key: row.code,
                expected: self.label_columns.len(),
                actual: row.labels.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Rows whose code equals `code`, in table order.
    pub fn rows_with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a SourceRow> + 'a {
        self.rows.iter().filter(move |row| row.code == code)
    }
}

/// Role of a row in a classified table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    /// Mean of every matched source row.
    Aggregate,
    /// Copy of one matched source row.
    Detail,
    /// Target with no matching source; all values missing.
    Placeholder,
}

impl RowKind {
    /// Whether later passes and layer joins read this row.
    pub fn is_summary(self) -> bool {
        matches!(self, Self::Aggregate | Self::Placeholder)
    }
}

/// One output row of a mapping pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    pub code: String,
    pub label: String,
    pub kind: RowKind,
    /// Labels of the source row, or [`AGGREGATE_LABEL`] for summary rows.
    pub source_labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

/// Values re-aggregated onto a target classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedTable {
    pub code_column: String,
    pub label_column: String,
    pub source_label_columns: Vec<String>,
    pub metrics: Vec<String>,
    pub rows: Vec<ClassifiedRow>,
}

impl ClassifiedTable {
    /// Aggregate and placeholder rows, one per mapping rule.
    pub fn summary_rows(&self) -> impl Iterator<Item = &ClassifiedRow> {
        self.rows.iter().filter(|row| row.kind.is_summary())
    }

    /// Rows carrying `code`, in output order.
    pub fn rows_with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ClassifiedRow> + 'a {
        self.rows.iter().filter(move |row| row.code == code)
    }

    /// Summary value of `code` for `metric`.
    pub fn value(&self, code: &str, metric: &str) -> Option<f64> {
        let index = self.metrics.iter().position(|m| m == metric)?;
        self.summary_rows()
            .find(|row| row.code == code)
            .and_then(|row| row.values.get(index).copied().flatten())
    }

    /// Turns the summary rows into the input of the next mapping pass.
    ///
    /// The target code becomes the source code and the target label the only
    /// label column.
    pub fn into_source(self) -> SourceTable {
        let rows = self
            .rows
            .into_iter()
            .filter(|row| row.kind.is_summary())
            .map(|row| SourceRow {
                code: row.code,
                labels: vec![row.label],
                values: row.values,
            })
            .collect();
        SourceTable {
            code_column: self.code_column,
            label_columns: vec![self.label_column],
            metrics: self.metrics,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, kind: RowKind, value: Option<f64>) -> ClassifiedRow {
        ClassifiedRow {
            code: code.to_string(),
            label: format!("label-{code}"),
            kind,
            source_labels: vec![AGGREGATE_LABEL.to_string()],
            values: vec![value],
        }
    }

    fn table() -> ClassifiedTable {
        ClassifiedTable {
            code_column: "空間代號".to_string(),
            label_column: "使用空間名稱".to_string(),
            source_label_columns: vec!["建物用途".to_string()],
            metrics: vec!["EUI_關東".to_string()],
            rows: vec![
                row("A1", RowKind::Aggregate, Some(2.0)),
                row("A1", RowKind::Detail, Some(1.0)),
                row("A1", RowKind::Detail, Some(3.0)),
                row("A2", RowKind::Placeholder, None),
            ],
        }
    }

    #[test]
    fn test_value_reads_summary_row() {
        let t = table();
        assert_eq!(t.value("A1", "EUI_關東"), Some(2.0));
        assert_eq!(t.value("A2", "EUI_關東"), None);
        assert_eq!(t.value("A1", "EUI_九州"), None);
        assert_eq!(t.rows_with_code("A1").count(), 3);
    }

    #[test]
    fn test_into_source_keeps_summary_rows() {
        let source = table().into_source();
        assert_eq!(source.code_column, "空間代號");
        assert_eq!(source.label_columns, vec!["使用空間名稱".to_string()]);
        let codes: Vec<_> = source.rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["A1", "A2"]);
        assert_eq!(source.rows[0].labels, vec!["label-A1".to_string()]);
    }

    #[test]
    fn test_source_push_checks_shape() {
        let mut source = SourceTable::new("code", vec!["name".into()], vec!["m".into()]);
        let bad = SourceRow {
            code: "1".into(),
            labels: vec![],
            values: vec![None],
        };
        assert!(source.push(bad).is_err());
        let good = SourceRow {
            code: "1".into(),
            labels: vec!["x".into()],
            values: vec![Some(1.0)],
        };
        assert!(source.push(good).is_ok());
        assert_eq!(source.rows_with_code("1").count(), 1);
    }
}
