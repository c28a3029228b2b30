//! Raw per-building survey measurements.

use crate::error::{ModelError, Result};
use crate::region::RegionBucket;

/// One measured building.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub building_type: String,
    /// Survey identifier; its leading letter selects the region bucket.
    pub identifier: String,
    /// One value per metric of the owning table, `None` when not measured.
    pub values: Vec<Option<f64>>,
}

impl RawObservation {
    pub fn new(
        building_type: impl Into<String>,
        identifier: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Self {
        Self {
            building_type: building_type.into(),
            identifier: identifier.into(),
            values,
        }
    }

    pub fn bucket(&self) -> Option<RegionBucket> {
        RegionBucket::from_identifier(&self.identifier)
    }
}

/// Observations sharing one list of metric columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    pub metrics: Vec<String>,
    pub rows: Vec<RawObservation>,
}

impl ObservationTable {
    pub fn new(metrics: Vec<String>) -> Self {
        Self {
            metrics,
            rows: Vec::new(),
        }
    }

    /// Appends a row after checking it carries one value per metric.
    pub fn push(&mut self, row: RawObservation) -> Result<()> {
        if row.values.len() != self.metrics.len() {
            return Err(ModelError::ShapeMismatch {
                key: row.identifier,
                expected: self.metrics.len(),
                actual: row.values.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Drops rows whose identifier does not start with a bucket letter and
    /// returns how many were removed.
    pub fn retain_bucketed(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| row.bucket().is_some());
        before - self.rows.len()
    }

    pub fn metric_index(&self, name: &str) -> Option<usize> {
        self.metrics.iter().position(|metric| metric == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ObservationTable {
        ObservationTable::new(vec!["elec".to_string(), "primary".to_string()])
    }

    #[test]
    fn test_push_checks_shape() {
        let mut t = table();
        assert!(
            t.push(RawObservation::new("事務所", "A01", vec![Some(1.0), None]))
                .is_ok()
        );
        let err = t
            .push(RawObservation::new("事務所", "A02", vec![Some(1.0)]))
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::ShapeMismatch {
                key: "A02".to_string(),
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_retain_bucketed() {
        let mut t = table();
        for id in ["A1", "H2", "Z3", "", "x"] {
            t.push(RawObservation::new("病院", id, vec![None, None]))
                .unwrap();
        }
        assert_eq!(t.retain_bucketed(), 3);
        let ids: Vec<_> = t.rows.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["A1", "H2"]);
    }
}
