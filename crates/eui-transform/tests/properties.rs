//! Property tests for aggregation and mapping.

use std::collections::BTreeMap;

use eui_common::{TextEncoding, frame_to_csv_bytes};
use eui_model::{
    MappingRule, ObservationTable, RawObservation, RegionBucket, RowKind, SourceRow, SourceSpec,
    SourceTable,
};
use eui_transform::{
    OutputLanguage, TargetColumns, fill_missing_counts, fill_missing_means, group_by_bucket,
    group_table_frame, map_pass,
};
use proptest::prelude::*;

const TYPES: [&str; 3] = ["事務所", "病院", "高校"];
const LETTERS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

fn observation() -> impl Strategy<Value = (usize, usize, Option<f64>)> {
    (
        0..TYPES.len(),
        0..LETTERS.len(),
        prop::option::weighted(0.8, 0.0f64..1000.0),
    )
}

fn build_table(rows: &[(usize, usize, Option<f64>)]) -> ObservationTable {
    let mut table = ObservationTable::new(vec!["elec".to_string()]);
    for (i, (ty, letter, value)) in rows.iter().enumerate() {
        let id = format!("{}{i:04}", LETTERS[*letter]);
        table
            .push(RawObservation::new(TYPES[*ty], id, vec![*value]))
            .unwrap();
    }
    table
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn group_mean_equals_arithmetic_mean(rows in prop::collection::vec(observation(), 1..60)) {
        let table = build_table(&rows);
        let grouped = group_by_bucket(&table);

        let mut expected: BTreeMap<(usize, usize), Vec<f64>> = BTreeMap::new();
        for (ty, letter, value) in &rows {
            let entry = expected.entry((*ty, *letter)).or_default();
            if let Some(v) = value {
                entry.push(*v);
            }
        }
        for ((ty, letter), values) in expected {
            let bucket = RegionBucket::from_letter(LETTERS[letter]).unwrap();
            let stat = grouped.stat(TYPES[ty], "elec", bucket).unwrap();
            prop_assert_eq!(stat.count, Some(values.len()));
            if values.is_empty() {
                prop_assert_eq!(stat.mean, None);
            } else {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                prop_assert!(close(stat.mean.unwrap(), mean));
            }
        }
    }

    #[test]
    fn filled_cells_use_across_bucket_mean(rows in prop::collection::vec(observation(), 1..60)) {
        let mut grouped = group_by_bucket(&build_table(&rows));
        let before = grouped.clone();
        fill_missing_means(&mut grouped);
        fill_missing_counts(&mut grouped);

        for (row, original) in grouped.rows.iter().zip(&before.rows) {
            let present: Vec<f64> = original.means(0).into_iter().flatten().collect();
            for (b, cell) in row.stats[0].iter().enumerate() {
                prop_assert!(cell.count.is_some());
                match original.stats[0][b].mean {
                    Some(v) => prop_assert_eq!(cell.mean, Some(v)),
                    None if present.is_empty() => prop_assert_eq!(cell.mean, None),
                    None => {
                        let fallback = present.iter().sum::<f64>() / present.len() as f64;
                        prop_assert!(close(cell.mean.unwrap(), fallback));
                    }
                }
            }
        }
    }

    #[test]
    fn aggregation_output_is_deterministic(rows in prop::collection::vec(observation(), 1..40)) {
        let render = || {
            let mut grouped = group_by_bucket(&build_table(&rows));
            fill_missing_means(&mut grouped);
            fill_missing_counts(&mut grouped);
            let mut df = group_table_frame(&grouped, OutputLanguage::Chinese, 2).unwrap();
            frame_to_csv_bytes(&mut df, TextEncoding::Utf8Bom).unwrap().0
        };
        prop_assert_eq!(render(), render());
    }

    #[test]
    fn list_rule_aggregate_is_mean_of_sources(
        values in prop::collection::vec(prop::option::weighted(0.8, -50.0f64..500.0), 1..10),
        picks in prop::collection::btree_set(0usize..10, 1..5),
    ) {
        let mut source = SourceTable::new("code", vec!["label".to_string()], vec!["EUI_關東".to_string()]);
        for (i, value) in values.iter().enumerate() {
            source.push(SourceRow {
                code: i.to_string(),
                labels: vec![format!("type-{i}")],
                values: vec![*value],
            }).unwrap();
        }
        let codes: Vec<String> = picks.iter().map(|i| i.to_string()).collect();
        let rule = MappingRule::new("05", "target", SourceSpec::List(codes)).unwrap();
        let out = map_pass(&source, &[rule], TargetColumns { code: "c", label: "l" });

        let matched: Vec<Option<f64>> = picks
            .iter()
            .filter(|i| **i < values.len())
            .map(|i| values[*i])
            .collect();
        if matched.is_empty() {
            prop_assert_eq!(out.rows.len(), 1);
            prop_assert_eq!(out.rows[0].kind, RowKind::Placeholder);
        } else {
            prop_assert_eq!(out.rows.len(), matched.len() + 1);
            prop_assert_eq!(out.rows[0].kind, RowKind::Aggregate);
            let present: Vec<f64> = matched.iter().flatten().copied().collect();
            match out.rows[0].values[0] {
                None => prop_assert!(present.is_empty()),
                Some(v) => {
                    let mean = present.iter().sum::<f64>() / present.len() as f64;
                    prop_assert!(close(v, mean));
                }
            }
            prop_assert!(out.rows.iter().all(|r| r.code == "05"));
        }
    }
}

#[test]
fn test_three_sources_give_four_rows() {
    let mut source = SourceTable::new("code", vec!["label".to_string()], vec!["EUI_關東".to_string()]);
    for (code, value) in [("3", 3.0), ("7", 7.0), ("9", 11.0), ("4", 100.0)] {
        source
            .push(SourceRow {
                code: code.to_string(),
                labels: vec![format!("type-{code}")],
                values: vec![Some(value)],
            })
            .unwrap();
    }
    let rule = MappingRule::new("05", "辦公", SourceSpec::parse("3, 7, 9", Default::default())).unwrap();
    let out = map_pass(&source, &[rule], TargetColumns { code: "c", label: "l" });

    assert_eq!(out.rows.len(), 4);
    assert!(out.rows.iter().all(|r| r.code == "05" && r.label == "辦公"));
    assert_eq!(out.rows[0].values[0], Some(7.0));
}
