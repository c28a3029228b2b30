//! Per (building type, region bucket) statistics.

use crate::region::RegionBucket;

/// Mean and sample count of one metric in one bucket.
///
/// `None` marks a cell with no statistic yet. The fill steps in the
/// transform crate replace missing means and counts separately.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupStat {
    pub mean: Option<f64>,
    pub count: Option<usize>,
}

/// Statistics of one building type, indexed `[metric][bucket]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub building_type: String,
    pub stats: Vec<Vec<GroupStat>>,
}

impl GroupRow {
    pub fn empty(building_type: impl Into<String>, metrics: usize, buckets: usize) -> Self {
        Self {
            building_type: building_type.into(),
            stats: vec![vec![GroupStat::default(); buckets]; metrics],
        }
    }

    /// Means of one metric across buckets.
    pub fn means(&self, metric: usize) -> Vec<Option<f64>> {
        self.stats
            .get(metric)
            .map(|cells| cells.iter().map(|cell| cell.mean).collect())
            .unwrap_or_default()
    }
}

/// Grouped statistics for every building type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupTable {
    pub metrics: Vec<String>,
    pub buckets: Vec<RegionBucket>,
    pub rows: Vec<GroupRow>,
}

impl GroupTable {
    pub fn metric_index(&self, name: &str) -> Option<usize> {
        self.metrics.iter().position(|metric| metric == name)
    }

    pub fn bucket_index(&self, bucket: RegionBucket) -> Option<usize> {
        self.buckets.iter().position(|b| *b == bucket)
    }

    pub fn row(&self, building_type: &str) -> Option<&GroupRow> {
        self.rows
            .iter()
            .find(|row| row.building_type == building_type)
    }

    pub fn stat(&self, building_type: &str, metric: &str, bucket: RegionBucket) -> Option<GroupStat> {
        let m = self.metric_index(metric)?;
        let b = self.bucket_index(bucket)?;
        self.row(building_type)?.stats.get(m)?.get(b).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_lookup() {
        let mut row = GroupRow::empty("病院", 1, 2);
        row.stats[0][1] = GroupStat {
            mean: Some(4.0),
            count: Some(2),
        };
        let table = GroupTable {
            metrics: vec!["elec".to_string()],
            buckets: vec![RegionBucket::A, RegionBucket::B],
            rows: vec![row],
        };
        assert_eq!(
            table.stat("病院", "elec", RegionBucket::B),
            Some(GroupStat {
                mean: Some(4.0),
                count: Some(2)
            })
        );
        assert_eq!(table.stat("病院", "elec", RegionBucket::C), None);
        assert_eq!(table.stat("事務所", "elec", RegionBucket::A), None);
        assert_eq!(table.rows[0].means(0), vec![None, Some(4.0)]);
    }
}
