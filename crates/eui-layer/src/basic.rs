//! Basic coefficient layer built from world administrative boundaries.

use std::collections::BTreeMap;

use eui_model::columns::{COEF_CIE, COUNTRY, EUI_PREFIX, REGNAME};
use eui_model::{ClassLookup, DROPPED_TERRITORIES, EXCLUDED_ISO_CODES, territory_iso_fix};

use crate::error::{LayerError, Result};
use crate::join::broadcast_lookup;
use crate::layer::{AttrValue, Field, Layer};

/// Country name field of the world boundaries layer.
pub const WORLD_NAME_FIELD: &str = "name";
/// ISO 3166-1 alpha-2 field of the world boundaries layer.
pub const WORLD_ISO_FIELD: &str = "iso_3166_1_";
/// `COUNTRY` value of the polygon whose EUI columns come from `EUI_SG.csv`.
pub const SINGAPORE_COUNTRY: &str = "SG-Singapore";

/// How polygons without an ISO code are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorldMode {
    /// Assign disputed territories to a country so the world stays covered.
    #[default]
    Merge,
    /// Drop polygons without an ISO code.
    Standalone,
}

/// Reference values joined onto every basic-method polygon.
#[derive(Debug, Clone, Copy)]
pub struct BasicInputs<'a> {
    /// Electricity carbon intensity keyed by ISO code.
    pub coefficients: &'a BTreeMap<String, Option<f64>>,
    /// EEWH EUI means as a single-key lookup.
    pub eewh: &'a ClassLookup,
    /// Key of the single `eewh` row.
    pub eewh_key: &'a str,
    /// Singapore values in EUI column order.
    pub singapore: Option<&'a [Option<f64>]>,
}

/// Builds the basic coefficient layer.
///
/// Output fields: `COUNTRY`, `REGNAME`, `Coef_CIE`, then one `EUI_<code>`
/// column per EEWH code.
pub fn build_basic_layer(
    world: &Layer,
    mode: WorldMode,
    inputs: BasicInputs<'_>,
) -> Result<Layer> {
    let name_index = world.require_field(WORLD_NAME_FIELD)?;
    let iso_index = world.require_field(WORLD_ISO_FIELD)?;

    let mut layer = Layer::new(vec![
        Field::text(COUNTRY),
        Field::text(REGNAME),
        Field::number(COEF_CIE),
    ]);
    let mut dropped = 0usize;
    let mut unassigned = 0usize;
    for feature in &world.features {
        let name = feature.attributes[name_index]
            .display()
            .unwrap_or_default();
        let mut iso = feature.attributes[iso_index]
            .display()
            .map(|iso| iso.trim().to_string())
            .filter(|iso| !iso.is_empty());

        match mode {
            WorldMode::Merge => {
                if DROPPED_TERRITORIES.contains(&name.as_str()) {
                    dropped += 1;
                    continue;
                }
                if let Some(fixed) = territory_iso_fix(&name) {
                    iso = Some(fixed.to_string());
                }
            }
            WorldMode::Standalone => {
                if iso.is_none() {
                    dropped += 1;
                    continue;
                }
            }
        }
        if iso
            .as_deref()
            .is_some_and(|iso| EXCLUDED_ISO_CODES.contains(&iso))
        {
            dropped += 1;
            continue;
        }

        let country = match &iso {
            Some(iso) => Some(format!("{iso}-{name}")),
            None => {
                unassigned += 1;
                None
            }
        };
        let coefficient = iso
            .as_ref()
            .and_then(|iso| inputs.coefficients.get(iso).copied().flatten());
        layer.push(
            feature.geometry.clone(),
            vec![
                AttrValue::Text(country),
                AttrValue::text(name),
                AttrValue::Number(coefficient),
            ],
        )?;
    }

    broadcast_lookup(&mut layer, inputs.eewh, inputs.eewh_key)?;
    if let Some(values) = inputs.singapore {
        replace_country_eui(&mut layer, SINGAPORE_COUNTRY, values)?;
    }

    if unassigned > 0 {
        tracing::warn!(unassigned, "polygons without ISO code kept without COUNTRY");
    }
    tracing::info!(
        mode = ?mode,
        features = layer.len(),
        dropped,
        "built basic coefficient layer"
    );
    Ok(layer)
}

/// Overwrites the `EUI_*` columns of every feature of `country`, in field order.
pub fn replace_country_eui(
    layer: &mut Layer,
    country: &str,
    values: &[Option<f64>],
) -> Result<usize> {
    let country_index = layer.require_field(COUNTRY)?;
    let eui_indices: Vec<usize> = layer
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.name.starts_with(EUI_PREFIX))
        .map(|(index, _)| index)
        .collect();
    if eui_indices.len() != values.len() {
        return Err(LayerError::LengthMismatch {
            target: country.to_string(),
            expected: eui_indices.len(),
            actual: values.len(),
        });
    }

    let mut replaced = 0;
    for feature in &mut layer.features {
        if feature.attributes[country_index].as_text() != Some(country) {
            continue;
        }
        for (&index, value) in eui_indices.iter().zip(values) {
            feature.attributes[index] = AttrValue::Number(*value);
        }
        replaced += 1;
    }
    if replaced == 0 {
        tracing::warn!(country, "no polygon to receive replacement EUI values");
    }
    Ok(replaced)
}
