//! Per-region value lookup joined onto polygons.
//!
//! A lookup is the transpose of the summary rows of one or more classified
//! tables: each classification code becomes a column `EUI_<code>` and each
//! region (or climate zone) becomes a key.

use std::collections::BTreeMap;

use crate::error::{ModelError, Result};

/// Column values keyed by region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassLookup {
    pub columns: Vec<String>,
    values: BTreeMap<String, Vec<Option<f64>>>,
}

impl ClassLookup {
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            columns: Vec::new(),
            values: keys.into_iter().map(|key| (key, Vec::new())).collect(),
        }
    }

    /// Adds one column with a value per key.
    ///
    /// Keys missing from `values` receive `None`. A column that already exists
    /// is overwritten in place.
    pub fn push_column(&mut self, name: impl Into<String>, values: &BTreeMap<String, Option<f64>>) {
        let name = name.into();
        let existing = self.columns.iter().position(|column| *column == name);
        if existing.is_none() {
            self.columns.push(name);
        }
        for (key, row) in &mut self.values {
            let value = values.get(key).copied().flatten();
            match existing {
                Some(index) => row[index] = value,
                None => row.push(value),
            }
        }
    }

    /// Appends every column of `other`, which must share this lookup's keys.
    pub fn extend(&mut self, other: &ClassLookup) -> Result<()> {
        for key in other.values.keys() {
            if !self.values.contains_key(key) {
                return Err(ModelError::ShapeMismatch {
                    key: key.clone(),
                    expected: self.values.len(),
                    actual: other.values.len(),
                });
            }
        }
        for (index, column) in other.columns.iter().enumerate() {
            let column_values: BTreeMap<String, Option<f64>> = other
                .values
                .iter()
                .map(|(key, row)| (key.clone(), row.get(index).copied().flatten()))
                .collect();
            self.push_column(column.clone(), &column_values);
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&[Option<f64>]> {
        self.values.get(key).map(Vec::as_slice)
    }

    pub fn value(&self, key: &str, column: &str) -> Option<f64> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.get(key)?.get(index).copied().flatten()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(pairs: &[(&str, Option<f64>)]) -> BTreeMap<String, Option<f64>> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), *v))
            .collect()
    }

    #[test]
    fn test_push_and_get() {
        let mut lookup = ClassLookup::new(["關東".to_string(), "九州".to_string()]);
        lookup.push_column("EUI_A1", &column(&[("關東", Some(1.5))]));
        lookup.push_column("EUI_05", &column(&[("關東", Some(2.0)), ("九州", Some(3.0))]));
        assert_eq!(lookup.columns, vec!["EUI_A1", "EUI_05"]);
        assert_eq!(lookup.get("九州"), Some(&[None, Some(3.0)][..]));
        assert_eq!(lookup.value("關東", "EUI_05"), Some(2.0));
        assert_eq!(lookup.value("沖縄", "EUI_05"), None);
    }

    #[test]
    fn test_push_existing_column_overwrites() {
        let mut lookup = ClassLookup::new(["k".to_string()]);
        lookup.push_column("EUI_01", &column(&[("k", Some(1.0))]));
        lookup.push_column("EUI_01", &column(&[("k", Some(9.0))]));
        assert_eq!(lookup.columns.len(), 1);
        assert_eq!(lookup.value("k", "EUI_01"), Some(9.0));
    }

    #[test]
    fn test_extend_requires_known_keys() {
        let mut a = ClassLookup::new(["k".to_string()]);
        a.push_column("EUI_A1", &column(&[("k", Some(1.0))]));
        let mut b = ClassLookup::new(["k".to_string()]);
        b.push_column("EUI_01", &column(&[("k", Some(2.0))]));
        a.extend(&b).unwrap();
        assert_eq!(a.get("k"), Some(&[Some(1.0), Some(2.0)][..]));

        let c = ClassLookup::new(["other".to_string()]);
        assert!(a.extend(&c).is_err());
    }
}
