//! Global merge of the basic layer with country-specific layers.

use std::collections::BTreeSet;

use eui_common::mean_of;
use eui_model::BackFillConfig;
use eui_model::columns::{CLIMATEZONE, COEF_CIE, COUNTRY, REGNAME};

use crate::error::Result;
use crate::layer::{AttrValue, Feature, Field, FieldKind, Layer, country_iso};

/// Fields that lead the merged layer, in order, when present.
pub const LEADING_FIELDS: [&str; 4] = [COUNTRY, REGNAME, COEF_CIE, CLIMATEZONE];

/// Layer produced by the country-specific EUI method.
#[derive(Debug, Clone)]
pub struct CountryLayer {
    /// ISO prefix of `COUNTRY` this layer replaces.
    pub iso: String,
    pub layer: Layer,
}

/// Counts reported by [`merge_layers`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub basic_kept: usize,
    pub basic_replaced: usize,
    pub country_features: usize,
    /// Countries without a basic-layer coefficient.
    pub missing_coefficients: Vec<String>,
}

fn coefficient_for(basic: &Layer, iso: &str) -> Result<Option<f64>> {
    let country_index = basic.require_field(COUNTRY)?;
    let coef_index = basic.require_field(COEF_CIE)?;
    Ok(basic
        .features
        .iter()
        .find(|feature| {
            feature.attributes[country_index]
                .as_text()
                .is_some_and(|country| country_iso(country) == iso)
        })
        .and_then(|feature| feature.attributes[coef_index].as_number()))
}

/// Merged field list: leading fields present in any layer, then every other
/// field in first-appearance order.
fn merged_fields(layers: &[&Layer]) -> Vec<Field> {
    let mut fields: Vec<Field> = Vec::new();
    let mut push = |field: &Field| {
        if !fields.iter().any(|f| f.name == field.name) {
            fields.push(field.clone());
        }
    };
    for name in LEADING_FIELDS {
        if let Some(field) = layers
            .iter()
            .find_map(|layer| layer.fields.iter().find(|f| f.name == name))
        {
            push(field);
        }
    }
    for layer in layers {
        for field in &layer.fields {
            push(field);
        }
    }
    fields
}

fn conform(layer: Layer, fields: &[Field]) -> Vec<Feature> {
    let indices: Vec<Option<usize>> = fields
        .iter()
        .map(|field| layer.field_index(&field.name))
        .collect();
    layer
        .features
        .into_iter()
        .map(|feature| {
            let attributes = fields
                .iter()
                .zip(&indices)
                .map(|(field, index)| match index {
                    Some(i) => feature.attributes[*i].clone().coerce(field.kind),
                    None => AttrValue::missing(field.kind),
                })
                .collect();
            Feature {
                geometry: feature.geometry,
                attributes,
            }
        })
        .collect()
}

/// Concatenates the basic layer with country-specific layers.
///
/// Each country layer receives the basic layer's `Coef_CIE` for its ISO
/// prefix, and the basic polygons of that country are removed, so every
/// polygon appears exactly once.
pub fn merge_layers(
    mut basic: Layer,
    countries: Vec<CountryLayer>,
) -> Result<(Layer, MergeReport)> {
    let mut report = MergeReport::default();
    let country_index = basic.require_field(COUNTRY)?;

    let mut overrides = Vec::with_capacity(countries.len());
    let mut replaced_isos = BTreeSet::new();
    for CountryLayer { iso, mut layer } in countries {
        let coefficient = coefficient_for(&basic, &iso)?;
        if coefficient.is_none() {
            tracing::warn!(country = %iso, "no Coef_CIE for country in basic layer");
            report.missing_coefficients.push(iso.clone());
        }
        layer.fill_field(Field::number(COEF_CIE), &AttrValue::Number(coefficient));
        report.country_features += layer.len();
        replaced_isos.insert(iso);
        overrides.push(layer);
    }

    let before = basic.len();
    basic.retain(|feature| {
        !feature.attributes[country_index]
            .as_text()
            .is_some_and(|country| replaced_isos.contains(country_iso(country)))
    });
    report.basic_kept = basic.len();
    report.basic_replaced = before - basic.len();

    let fields = {
        let mut all: Vec<&Layer> = vec![&basic];
        all.extend(overrides.iter());
        merged_fields(&all)
    };
    let mut merged = Layer::new(fields.clone());
    merged.features = conform(basic, &fields);
    for layer in overrides {
        merged.features.extend(conform(layer, &fields));
    }

    tracing::info!(
        basic = report.basic_kept,
        replaced = report.basic_replaced,
        country = report.country_features,
        features = merged.len(),
        "merged layers"
    );
    Ok((merged, report))
}

/// Fills missing values of the configured columns with the mean of the
/// reference country's values. Returns the number of cells filled.
pub fn back_fill(layer: &mut Layer, config: &BackFillConfig) -> Result<usize> {
    let country_index = layer.require_field(COUNTRY)?;
    let mut filled = 0;
    for column in &config.columns {
        let Some(index) = layer.field_index(column) else {
            tracing::warn!(column = %column, "back-fill column not in layer");
            continue;
        };
        if layer.fields[index].kind != FieldKind::Number {
            tracing::warn!(column = %column, "back-fill column is not numeric");
            continue;
        }
        let mean = mean_of(
            layer
                .features
                .iter()
                .filter(|f| {
                    f.attributes[country_index].as_text() == Some(config.reference_country.as_str())
                })
                .map(|f| f.attributes[index].as_number()),
        );
        let Some(mean) = mean else {
            tracing::warn!(
                column = %column,
                reference = %config.reference_country,
                "reference country has no values to back-fill from"
            );
            continue;
        };
        for feature in &mut layer.features {
            if feature.attributes[index].is_missing() {
                feature.attributes[index] = AttrValue::Number(Some(mean));
                filled += 1;
            }
        }
        tracing::debug!(column = %column, mean, "back-filled column");
    }
    Ok(filled)
}
