//! US county layer keyed by climate zone.

use eui_common::format_numeric;
use eui_model::columns::{CLIMATEZONE, COUNTRY, REGNAME};
use eui_model::{ClassLookup, reduce_iecc_zone};

use crate::error::Result;
use crate::join::attach_lookup;
use crate::layer::{AttrValue, Field, Layer};

pub const US_COUNTRY: &str = "US-美國";

pub const COUNTY_NAME_FIELD: &str = "NAME";
pub const STATE_NAME_FIELD: &str = "STATE_NAME";
pub const IECC_CLIMATE_FIELD: &str = "IECC_Clima";
pub const IECC_MOISTURE_FIELD: &str = "IECC_Moist";

/// IECC code of a county: climate number followed by moisture letter.
///
/// `N/A` moisture (zones 7 and 8) contributes nothing. Numbers stored as
/// floats (`5.0`) are truncated to their integer part.
pub fn climate_code(climate: &AttrValue, moisture: &AttrValue) -> Option<String> {
    let number = climate.as_number()?.trunc();
    let moisture = moisture
        .display()
        .map(|m| m.replace("N/A", "").trim().to_string())
        .unwrap_or_default();
    Some(format!("{}{moisture}", format_numeric(number)))
}

/// Builds the US layer from county polygons.
///
/// `lookup` is keyed by coarse climate-zone label. Output fields: `COUNTRY`,
/// `REGNAME` (`<state> - <county>`), `CLIMATEZONE`, then the lookup columns.
pub fn build_us_layer(counties: &Layer, lookup: &ClassLookup) -> Result<Layer> {
    let county_index = counties.require_field(COUNTY_NAME_FIELD)?;
    let state_index = counties.require_field(STATE_NAME_FIELD)?;
    let climate_index = counties.require_field(IECC_CLIMATE_FIELD)?;
    let moisture_index = counties.require_field(IECC_MOISTURE_FIELD)?;

    let mut layer = Layer::new(vec![
        Field::text(COUNTRY),
        Field::text(REGNAME),
        Field::text(CLIMATEZONE),
    ]);
    let mut keys = Vec::with_capacity(counties.len());
    for feature in &counties.features {
        let attributes = &feature.attributes;
        let county = attributes[county_index].display().unwrap_or_default();
        let state = attributes[state_index].display().unwrap_or_default();
        let code = climate_code(&attributes[climate_index], &attributes[moisture_index]);
        let key = match &code {
            Some(code) => Some(reduce_iecc_zone(code)?.label().to_string()),
            None => None,
        };
        keys.push(key);
        layer.push(
            feature.geometry.clone(),
            vec![
                AttrValue::text(US_COUNTRY),
                AttrValue::text(format!("{state} - {county}")),
                AttrValue::Text(code),
            ],
        )?;
    }

    let unmatched = attach_lookup(&mut layer, lookup, &keys)?;
    tracing::info!(
        counties = layer.len(),
        unmatched,
        "built US climate-zone layer"
    );
    Ok(layer)
}
