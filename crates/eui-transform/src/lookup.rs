//! Pivoting classified tables into per-region lookups.

use std::collections::BTreeMap;

use eui_model::columns::{EUI_PREFIX, eui_column};
use eui_model::{ClassLookup, ClassifiedTable};

use crate::error::Result;

/// Region key of a metric column: `EUI_關東` → `關東`.
pub fn region_key(metric: &str) -> &str {
    metric.strip_prefix(EUI_PREFIX).unwrap_or(metric)
}

/// Transposes the summary rows of `table`.
///
/// Each metric becomes a lookup key and each summary row a column named
/// `EUI_<code>`.
pub fn pivot_summary_rows(table: &ClassifiedTable) -> ClassLookup {
    let mut lookup = ClassLookup::new(
        table
            .metrics
            .iter()
            .map(|metric| region_key(metric).to_string()),
    );
    for row in table.summary_rows() {
        let values: BTreeMap<String, Option<f64>> = table
            .metrics
            .iter()
            .zip(&row.values)
            .map(|(metric, value)| (region_key(metric).to_string(), *value))
            .collect();
        lookup.push_column(eui_column(&row.code), &values);
    }
    lookup
}

/// Pivots several classified tables sharing the same metrics and joins
/// their columns in order.
pub fn region_lookup(tables: &[&ClassifiedTable]) -> Result<ClassLookup> {
    let mut iter = tables.iter();
    let Some(first) = iter.next() else {
        return Ok(ClassLookup::default());
    };
    let mut lookup = pivot_summary_rows(first);
    for table in iter {
        lookup.extend(&pivot_summary_rows(table))?;
    }
    Ok(lookup)
}

/// Lookup with a single key holding `(code, value)` pairs as `EUI_<code>`
/// columns; used where every polygon receives the same values.
pub fn constant_lookup(key: &str, pairs: &[(String, Option<f64>)]) -> ClassLookup {
    let mut lookup = ClassLookup::new([key.to_string()]);
    for (code, value) in pairs {
        let values = BTreeMap::from([(key.to_string(), *value)]);
        lookup.push_column(eui_column(code), &values);
    }
    lookup
}
