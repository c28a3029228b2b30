//! Group aggregation of survey observations.

use std::collections::BTreeMap;

use eui_model::{GroupRow, GroupStat, GroupTable, ObservationTable, RegionBucket};

#[derive(Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    present: usize,
    rows: usize,
}

/// Groups observations by (building type, region bucket).
///
/// For each metric the mean and the count of present values are computed.
/// Every bucket `A`–`H` is materialised; a bucket without rows keeps both
/// statistics missing, a bucket whose rows lack the metric gets a missing
/// mean and a count of zero. Building types are sorted by code point.
/// Rows without a bucket letter are ignored.
pub fn group_by_bucket(table: &ObservationTable) -> GroupTable {
    let buckets = RegionBucket::ALL.to_vec();
    let metrics = table.metrics.len();
    let mut groups: BTreeMap<&str, Vec<Vec<Accumulator>>> = BTreeMap::new();

    for row in &table.rows {
        let Some(bucket) = row.bucket() else {
            continue;
        };
        let b = buckets.iter().position(|x| *x == bucket).unwrap_or_default();
        let cells = groups
            .entry(row.building_type.as_str())
            .or_insert_with(|| vec![vec![Accumulator::default(); buckets.len()]; metrics]);
        for (m, value) in row.values.iter().enumerate() {
            let acc = &mut cells[m][b];
            acc.rows += 1;
            if let Some(v) = value {
                acc.sum += v;
                acc.present += 1;
            }
        }
    }

    let rows = groups
        .into_iter()
        .map(|(building_type, cells)| GroupRow {
            building_type: building_type.to_string(),
            stats: cells
                .into_iter()
                .map(|metric_cells| {
                    metric_cells
                        .into_iter()
                        .map(|acc| GroupStat {
                            mean: (acc.present > 0).then(|| acc.sum / acc.present as f64),
                            count: (acc.rows > 0).then_some(acc.present),
                        })
                        .collect()
                })
                .collect(),
        })
        .collect::<Vec<_>>();

    tracing::debug!(types = rows.len(), "grouped observations by region bucket");
    GroupTable {
        metrics: table.metrics.clone(),
        buckets,
        rows,
    }
}
