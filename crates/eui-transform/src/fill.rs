//! Default values for empty group cells.
//!
//! Two independent steps: means fall back to the building type's mean over
//! the buckets that have one, counts fall back to zero.

use eui_common::mean_of;
use eui_model::GroupTable;

/// Fills missing means with the mean across present buckets of the same
/// building type and metric.
///
/// A type with no mean in any bucket keeps every cell missing. Returns the
/// number of filled cells.
pub fn fill_missing_means(table: &mut GroupTable) -> usize {
    let mut filled = 0;
    for row in &mut table.rows {
        for cells in &mut row.stats {
            let Some(fallback) = mean_of(cells.iter().map(|cell| cell.mean)) else {
                continue;
            };
            for cell in cells.iter_mut().filter(|cell| cell.mean.is_none()) {
                cell.mean = Some(fallback);
                filled += 1;
            }
        }
    }
    tracing::debug!(filled, "filled missing group means");
    filled
}

/// Fills missing counts with zero. Returns the number of filled cells.
pub fn fill_missing_counts(table: &mut GroupTable) -> usize {
    let mut filled = 0;
    for cell in table
        .rows
        .iter_mut()
        .flat_map(|row| row.stats.iter_mut())
        .flat_map(|cells| cells.iter_mut())
        .filter(|cell| cell.count.is_none())
    {
        cell.count = Some(0);
        filled += 1;
    }
    tracing::debug!(filled, "filled missing group counts");
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use eui_model::{GroupRow, GroupStat, RegionBucket};

    fn table(means: Vec<Option<f64>>) -> GroupTable {
        let mut row = GroupRow::empty("事務所", 1, means.len());
        for (cell, mean) in row.stats[0].iter_mut().zip(means) {
            *cell = GroupStat {
                mean,
                count: mean.map(|_| 1),
            };
        }
        GroupTable {
            metrics: vec!["elec".to_string()],
            buckets: RegionBucket::ALL[..row.stats[0].len()].to_vec(),
            rows: vec![row],
        }
    }

    #[test]
    fn test_fill_missing_means_uses_row_mean() {
        let mut t = table(vec![Some(10.0), None, Some(20.0)]);
        assert_eq!(fill_missing_means(&mut t), 1);
        assert_eq!(t.rows[0].means(0), vec![Some(10.0), Some(15.0), Some(20.0)]);
        // Counts are a separate step.
        assert_eq!(t.rows[0].stats[0][1].count, None);
    }

    #[test]
    fn test_fill_missing_means_all_empty_stays_missing() {
        let mut t = table(vec![None, None]);
        assert_eq!(fill_missing_means(&mut t), 0);
        assert_eq!(t.rows[0].means(0), vec![None, None]);
    }

    #[test]
    fn test_fill_missing_counts() {
        let mut t = table(vec![Some(1.0), None]);
        assert_eq!(fill_missing_counts(&mut t), 1);
        assert_eq!(t.rows[0].stats[0][1].count, Some(0));
        assert_eq!(t.rows[0].stats[0][1].mean, None);
    }
}
