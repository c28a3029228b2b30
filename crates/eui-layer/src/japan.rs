//! Japan prefecture layer keyed by survey region.

use eui_model::columns::{COUNTRY, REGNAME};
use eui_model::{ClassLookup, prefecture_region};

use crate::error::{LayerError, Result};
use crate::join::attach_lookup;
use crate::layer::{AttrValue, Field, Layer};

pub const JAPAN_COUNTRY: &str = "JP-日本";

/// Prefecture name field of the usual administrative boundary layers.
pub const DEFAULT_PREFECTURE_FIELD: &str = "NAME_1";

/// Builds the Japan layer from prefecture polygons.
///
/// `lookup` is keyed by region name (`關東`, `九州`…). `REGNAME` holds the
/// official prefecture name.
pub fn build_japan_layer(
    prefectures: &Layer,
    name_field: &str,
    lookup: &ClassLookup,
) -> Result<Layer> {
    let name_index = prefectures.require_field(name_field)?;

    let mut layer = Layer::new(vec![Field::text(COUNTRY), Field::text(REGNAME)]);
    let mut keys = Vec::with_capacity(prefectures.len());
    for feature in &prefectures.features {
        let name = feature.attributes[name_index]
            .display()
            .ok_or_else(|| LayerError::InvalidValue {
                field: name_field.to_string(),
                value: String::new(),
            })?;
        let prefecture = prefecture_region(&name)?;
        keys.push(Some(prefecture.bucket.region_name().to_string()));
        layer.push(
            feature.geometry.clone(),
            vec![AttrValue::text(JAPAN_COUNTRY), AttrValue::text(prefecture.kanji)],
        )?;
    }

    attach_lookup(&mut layer, lookup, &keys)?;
    tracing::info!(prefectures = layer.len(), "built Japan region layer");
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use geo::MultiPolygon;

    use super::*;

    fn prefectures(names: &[&str]) -> Layer {
        let mut layer = Layer::new(vec![Field::text(DEFAULT_PREFECTURE_FIELD)]);
        for name in names {
            layer
                .push(MultiPolygon::new(vec![]), vec![AttrValue::text(*name)])
                .unwrap();
        }
        layer
    }

    fn lookup() -> ClassLookup {
        let mut lookup = ClassLookup::new(["關東".to_string(), "北海道".to_string()]);
        lookup.push_column(
            "EUI_A1",
            &BTreeMap::from([
                ("關東".to_string(), Some(150.2)),
                ("北海道".to_string(), Some(180.0)),
            ]),
        );
        lookup
    }

    #[test]
    fn test_build_japan_layer() {
        let source = prefectures(&["Tokyo", "Hokkaido", "山梨県"]);
        let layer = build_japan_layer(&source, "NAME_1", &lookup()).unwrap();
        assert_eq!(layer.len(), 3);
        assert_eq!(layer.text(0, COUNTRY), Some(JAPAN_COUNTRY));
        assert_eq!(layer.text(0, REGNAME), Some("東京都"));
        assert_eq!(layer.number(0, "EUI_A1"), Some(150.2));
        assert_eq!(layer.number(1, "EUI_A1"), Some(180.0));
        assert_eq!(layer.number(2, "EUI_A1"), Some(150.2));
    }

    #[test]
    fn test_unknown_prefecture() {
        let err = build_japan_layer(&prefectures(&["Seoul"]), "NAME_1", &lookup());
        assert!(matches!(err, Err(LayerError::Model(_))));
    }

    #[test]
    fn test_missing_name_field() {
        let err = build_japan_layer(&prefectures(&["Tokyo"]), "NAM", &lookup());
        assert!(matches!(err, Err(LayerError::MissingField { .. })));
    }
}
