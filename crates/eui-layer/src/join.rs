//! Attaching lookup columns to polygons.

use eui_model::ClassLookup;

use crate::error::Result;
use crate::layer::{AttrValue, Field, Layer};

/// Appends every column of `lookup` to `layer`.
///
/// `keys` holds one lookup key per feature. Features without a key, or with
/// a key the lookup does not know, receive missing values. Returns the number
/// of such features.
pub fn attach_lookup(
    layer: &mut Layer,
    lookup: &ClassLookup,
    keys: &[Option<String>],
) -> Result<usize> {
    let rows: Vec<Option<&[Option<f64>]>> = keys
        .iter()
        .map(|key| key.as_deref().and_then(|key| lookup.get(key)))
        .collect();
    let unmatched = rows.iter().filter(|row| row.is_none()).count();

    for (index, column) in lookup.columns.iter().enumerate() {
        let values = rows
            .iter()
            .map(|row| AttrValue::Number(row.and_then(|row| row.get(index).copied().flatten())))
            .collect();
        layer.set_field(Field::number(column.clone()), values)?;
    }

    if unmatched > 0 {
        tracing::warn!(
            unmatched,
            features = layer.len(),
            "features without lookup values"
        );
    }
    Ok(unmatched)
}

/// Joins the same lookup row onto every feature.
pub fn broadcast_lookup(layer: &mut Layer, lookup: &ClassLookup, key: &str) -> Result<usize> {
    let keys = vec![Some(key.to_string()); layer.len()];
    attach_lookup(layer, lookup, &keys)
}
