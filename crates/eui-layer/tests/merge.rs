//! Global merge invariants and the shapefile path through merge.

use eui_layer::{
    AttrValue, CountryLayer, Field, Layer, country_iso, merge_layers, read_layer, write_layer,
};
use eui_model::columns::{COEF_CIE, COUNTRY, REGNAME};
use geo::{MultiPolygon, polygon};
use proptest::prelude::*;

const ISO_CODES: [&str; 6] = ["TW", "JP", "US", "CN", "SG", "FR"];

fn square(x: f64, y: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![
        (x: x, y: y),
        (x: x + 1.0, y: y),
        (x: x + 1.0, y: y + 1.0),
        (x: x, y: y + 1.0),
        (x: x, y: y),
    ]])
}

fn basic_layer(counts: &[usize]) -> Layer {
    let mut layer = Layer::new(vec![
        Field::text(COUNTRY),
        Field::text(REGNAME),
        Field::number(COEF_CIE),
        Field::number("EUI_01"),
    ]);
    for (c, &count) in counts.iter().enumerate() {
        let iso = ISO_CODES[c];
        for i in 0..count {
            layer
                .push(
                    square(c as f64 * 10.0, i as f64),
                    vec![
                        AttrValue::text(format!("{iso}-basic")),
                        AttrValue::text(format!("{iso}{i}")),
                        AttrValue::Number(Some(0.1 * (c + 1) as f64)),
                        AttrValue::Number(Some(100.0)),
                    ],
                )
                .unwrap();
        }
    }
    layer
}

fn country_layer(iso: &str, count: usize) -> CountryLayer {
    let mut layer = Layer::new(vec![
        Field::text(COUNTRY),
        Field::text(REGNAME),
        Field::number("EUI_A1"),
    ]);
    for i in 0..count {
        layer
            .push(
                square(100.0, i as f64),
                vec![
                    AttrValue::text(format!("{iso}-override")),
                    AttrValue::text(format!("{iso}-region{i}")),
                    AttrValue::Number(Some(i as f64)),
                ],
            )
            .unwrap();
    }
    CountryLayer {
        iso: iso.to_string(),
        layer,
    }
}

proptest! {
    #[test]
    fn test_one_row_per_polygon_and_overrides_replace(
        basic_counts in prop::collection::vec(1usize..4, ISO_CODES.len()),
        overrides in prop::collection::btree_map(0usize..ISO_CODES.len(), 1usize..5, 0..4),
    ) {
        let basic = basic_layer(&basic_counts);
        let countries: Vec<CountryLayer> = overrides
            .iter()
            .map(|(&c, &count)| country_layer(ISO_CODES[c], count))
            .collect();

        let replaced: usize = overrides.keys().map(|&c| basic_counts[c]).sum();
        let added: usize = overrides.values().sum();
        let expected = basic.len() - replaced + added;

        let (merged, report) = merge_layers(basic, countries).unwrap();
        prop_assert_eq!(merged.len(), expected);
        prop_assert_eq!(report.basic_replaced, replaced);

        for (&c, &count) in &overrides {
            let iso = ISO_CODES[c];
            let rows: Vec<usize> = (0..merged.len())
                .filter(|&i| merged.text(i, COUNTRY).is_some_and(|v| country_iso(v) == iso))
                .collect();
            prop_assert_eq!(rows.len(), count);
            let label = format!("{iso}-override");
            for i in rows {
                prop_assert_eq!(merged.text(i, COUNTRY), Some(label.as_str()));
                let coef = merged.number(i, COEF_CIE).unwrap();
                prop_assert!((coef - 0.1 * (c + 1) as f64).abs() < 1e-12);
            }
        }
    }
}

#[test]
fn test_merge_reads_written_layers() {
    let dir = tempfile::TempDir::new().unwrap();
    let basic_path = dir.path().join("Basic_Coef.shp");
    let us_path = dir.path().join("US").join("US-美國.shp");

    write_layer(&basic_layer(&[1, 1, 2]), &basic_path, 3).unwrap();
    let mut us = country_layer("US", 3).layer;
    us.set_field(
        Field::text("CLIMATEZONE"),
        vec![AttrValue::text("4A"), AttrValue::text("5B"), AttrValue::text("7")],
    )
    .unwrap();
    write_layer(&us, &us_path, 1).unwrap();

    let basic = read_layer(&basic_path).unwrap();
    let us = read_layer(&us_path).unwrap();
    let (merged, _) = merge_layers(
        basic,
        vec![CountryLayer {
            iso: "US".to_string(),
            layer: us,
        }],
    )
    .unwrap();

    assert_eq!(merged.len(), 1 + 1 + 3);
    assert_eq!(
        merged.field_names().collect::<Vec<_>>(),
        [COUNTRY, REGNAME, COEF_CIE, "CLIMATEZONE", "EUI_01", "EUI_A1"]
    );
    assert_eq!(merged.text(4, "CLIMATEZONE"), Some("7"));
    let coef = merged.number(4, COEF_CIE).unwrap();
    assert!((coef - 0.3).abs() < 1e-9);
}
