//! Climate adjustment of US reference EUIs.
//!
//! The climate-projection study gives an EUI per sector (`Commercial`,
//! `Residential`) and climate zone. Dividing each by its sector mean yields a
//! zone factor; Energy Star site EUIs are scaled by the Commercial factor of
//! every zone, except lodging and residential buildings which use the
//! Residential factor.

use eui_common::mean_of;
use eui_model::columns::{BUILDING_TYPE_INDEX, DECC_BUILDING_TYPE, US_SECTOR, eui_column};
use eui_model::labels::{MARKET_SECTORS, PROPERTY_TYPES, translate};
use eui_model::{CoarseClimateZone, EnergyStarRecord, ProjectionRecord, SourceRow, SourceTable};

use crate::error::{Result, TransformError};
use crate::units::KBTU_PER_FT2_TO_KWH_PER_M2;

pub const COMMERCIAL_SECTOR: &str = "Commercial";
pub const RESIDENTIAL_SECTOR: &str = "Residential";
/// Energy Star market sector adjusted with the Residential factor.
pub const RESIDENTIAL_MARKET_SECTOR: &str = "Lodging/Residential";

/// Zone EUI divided by the mean EUI of its sector.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneFactor {
    pub sector: String,
    pub zone: String,
    pub factor: f64,
}

/// One Energy Star building type with an EUI per zone.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedRow {
    pub market_sector: String,
    pub property_type: String,
    pub values: Vec<Option<f64>>,
}

/// Climate-adjusted EUIs in kWh/m², one column per zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateAdjusted {
    /// Zone names in first-appearance order of the projection table.
    pub zones: Vec<String>,
    pub rows: Vec<AdjustedRow>,
}

/// Normalises every projection EUI by the mean of its sector.
pub fn zone_factors(records: &[ProjectionRecord]) -> Result<Vec<ZoneFactor>> {
    let mut factors = Vec::with_capacity(records.len());
    for record in records {
        let sector_mean = mean_of(
            records
                .iter()
                .filter(|r| r.sector == record.sector)
                .map(|r| Some(r.eui)),
        )
        .unwrap_or_default();
        if sector_mean == 0.0 {
            return Err(TransformError::ZeroSectorMean {
                sector: record.sector.clone(),
            });
        }
        factors.push(ZoneFactor {
            sector: record.sector.clone(),
            zone: record.zone.clone(),
            factor: record.eui / sector_mean,
        });
    }
    Ok(factors)
}

fn factor_for(factors: &[ZoneFactor], sector: &str, zone: &str) -> Result<f64> {
    factors
        .iter()
        .find(|f| f.sector == sector && f.zone == zone)
        .map(|f| f.factor)
        .ok_or_else(|| TransformError::MissingFactor {
            sector: sector.to_string(),
            zone: zone.to_string(),
        })
}

/// Scales each Energy Star EUI by the zone factors of its sector.
///
/// Site EUIs are converted from kBtu/ft² to kWh/m² first. A building type
/// without a published EUI gets missing values in every zone.
pub fn climate_adjust(
    projection: &[ProjectionRecord],
    energy_star: &[EnergyStarRecord],
) -> Result<ClimateAdjusted> {
    let factors = zone_factors(projection)?;
    let mut zones: Vec<String> = Vec::new();
    for record in projection {
        if !zones.contains(&record.zone) {
            zones.push(record.zone.clone());
        }
    }

    let mut rows = Vec::with_capacity(energy_star.len());
    for record in energy_star {
        let sector = if record.market_sector == RESIDENTIAL_MARKET_SECTOR {
            RESIDENTIAL_SECTOR
        } else {
            COMMERCIAL_SECTOR
        };
        let eui = record.site_eui_kbtu.map(|v| v * KBTU_PER_FT2_TO_KWH_PER_M2);
        let mut values = Vec::with_capacity(zones.len());
        for zone in &zones {
            let factor = factor_for(&factors, sector, zone)?;
            values.push(eui.map(|v| v * factor));
        }
        rows.push(AdjustedRow {
            market_sector: record.market_sector.clone(),
            property_type: record.property_type.clone(),
            values,
        });
    }

    tracing::info!(
        zones = zones.len(),
        building_types = rows.len(),
        "computed climate-adjusted EUI"
    );
    Ok(ClimateAdjusted { zones, rows })
}

/// Header of a zone column: `EUI_<zone label>` for known zones, otherwise the
/// zone name as written in the study.
pub fn zone_column(zone: &str) -> String {
    match CoarseClimateZone::from_projection_name(zone) {
        Ok(known) => eui_column(known.label()),
        Err(_) => {
            tracing::warn!(zone, "unknown climate zone name, keeping it as written");
            eui_column(zone)
        }
    }
}

/// Builds the climate-adjusted output table.
///
/// Codes are a sector letter (`A`, `B`, … in first-appearance order) followed
/// by the 1-based position within that sector: `A1`, `A2`, `B1`, …
pub fn adjusted_source_table(
    adjusted: &ClimateAdjusted,
    translate_labels: bool,
) -> Result<SourceTable> {
    let mut sectors: Vec<&str> = Vec::new();
    for row in &adjusted.rows {
        if !sectors.contains(&row.market_sector.as_str()) {
            sectors.push(&row.market_sector);
        }
    }
    if sectors.len() > 26 {
        return Err(TransformError::TooManySectors {
            count: sectors.len(),
        });
    }

    let mut table = SourceTable::new(
        BUILDING_TYPE_INDEX,
        vec![US_SECTOR.to_string(), DECC_BUILDING_TYPE.to_string()],
        adjusted.zones.iter().map(|zone| zone_column(zone)).collect(),
    );
    let mut positions = vec![0usize; sectors.len()];
    for row in &adjusted.rows {
        let s = sectors
            .iter()
            .position(|sector| *sector == row.market_sector)
            .unwrap_or_default();
        positions[s] += 1;
        let letter = char::from(b'A' + s as u8);
        let (sector, property) = if translate_labels {
            (
                translate(&MARKET_SECTORS, &row.market_sector).to_string(),
                translate(&PROPERTY_TYPES, &row.property_type).to_string(),
            )
        } else {
            (row.market_sector.clone(), row.property_type.clone())
        };
        table.push(SourceRow {
            code: format!("{letter}{}", positions[s]),
            labels: vec![sector, property],
            values: row.values.clone(),
        })?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> Vec<ProjectionRecord> {
        let rec = |sector: &str, zone: &str, eui: f64| ProjectionRecord {
            sector: sector.to_string(),
            zone: zone.to_string(),
            eui,
        };
        vec![
            rec("Commercial", "Hot-humid", 300.0),
            rec("Commercial", "Cold-dry", 100.0),
            rec("Residential", "Hot-humid", 50.0),
            rec("Residential", "Cold-dry", 150.0),
        ]
    }

    fn star(sector: &str, property: &str, eui: Option<f64>) -> EnergyStarRecord {
        EnergyStarRecord {
            market_sector: sector.to_string(),
            property_type: property.to_string(),
            site_eui_kbtu: eui,
        }
    }

    #[test]
    fn test_zone_factors() {
        let factors = zone_factors(&projection()).unwrap();
        assert_eq!(factors[0].factor, 1.5);
        assert_eq!(factors[1].factor, 0.5);
        assert_eq!(factors[2].factor, 0.5);
        assert_eq!(factors[3].factor, 1.5);
    }

    #[test]
    fn test_climate_adjust_uses_residential_factor_for_lodging() {
        let adjusted = climate_adjust(
            &projection(),
            &[
                star("Office", "Office", Some(10.0)),
                star("Lodging/Residential", "Hotel", Some(10.0)),
                star("Retail", "Strip Mall", None),
            ],
        )
        .unwrap();

        assert_eq!(adjusted.zones, vec!["Hot-humid", "Cold-dry"]);
        let kwh = 10.0 * KBTU_PER_FT2_TO_KWH_PER_M2;
        let close = |a: Option<f64>, b: f64| (a.unwrap() - b).abs() < 1e-9;
        assert!(close(adjusted.rows[0].values[0], kwh * 1.5));
        assert!(close(adjusted.rows[0].values[1], kwh * 0.5));
        assert!(close(adjusted.rows[1].values[0], kwh * 0.5));
        assert!(close(adjusted.rows[1].values[1], kwh * 1.5));
        assert_eq!(adjusted.rows[2].values, vec![None, None]);
    }

    #[test]
    fn test_climate_adjust_missing_factor() {
        let records: Vec<_> = projection()
            .into_iter()
            .filter(|r| !(r.sector == "Residential" && r.zone == "Cold-dry"))
            .collect();
        let err = climate_adjust(&records, &[star("Lodging/Residential", "Hotel", Some(1.0))])
            .unwrap_err();
        assert!(matches!(err, TransformError::MissingFactor { .. }));
    }

    #[test]
    fn test_adjusted_source_table_codes_and_labels() {
        let adjusted = climate_adjust(
            &projection(),
            &[
                star("Office", "Office", Some(1.0)),
                star("Retail", "Strip Mall", Some(1.0)),
                star("Office", "Financial Office", Some(1.0)),
            ],
        )
        .unwrap();

        let table = adjusted_source_table(&adjusted, true).unwrap();
        let codes: Vec<_> = table.rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["A1", "B1", "A2"]);
        assert_eq!(table.metrics, vec!["EUI_溼熱氣候區", "EUI_乾冷氣候區"]);
        assert_eq!(table.rows[1].labels, vec!["零售", "連鎖商場"]);

        let untranslated = adjusted_source_table(&adjusted, false).unwrap();
        assert_eq!(untranslated.rows[1].labels, vec!["Retail", "Strip Mall"]);
    }
}
