//! Random points inside country polygons.

use eui_common::float_column;
use eui_model::SamplingTarget;
use eui_model::columns::COUNTRY;
use geo::{Centroid, Contains, MultiPolygon, Point};
use polars::prelude::DataFrame;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::error::Result;
use crate::layer::{Layer, country_iso};

/// One accepted sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPoint {
    /// `COUNTRY` value of the polygons the point fell in.
    pub country: String,
    pub x: f64,
    pub y: f64,
}

/// Generator used for sampling; the same seed reproduces the same points.
pub fn seeded_rng(seed: u64) -> Pcg64 {
    Pcg64::seed_from_u64(seed)
}

/// All polygons of one country as a single geometry.
fn dissolve(
    layer: &Layer,
    country_index: usize,
    iso: &str,
) -> Option<(String, MultiPolygon<f64>)> {
    let mut label = None;
    let mut polygons = Vec::new();
    for feature in &layer.features {
        let Some(country) = feature.attributes[country_index].as_text() else {
            continue;
        };
        if country_iso(country) != iso {
            continue;
        }
        label.get_or_insert_with(|| country.to_string());
        polygons.extend(feature.geometry.0.iter().cloned());
    }
    label.map(|label| (label, MultiPolygon::new(polygons)))
}

/// Draws `points` uniform candidates in the square centroid ± `radius` of
/// each target country and keeps those strictly inside the country.
pub fn random_points<R: Rng>(
    layer: &Layer,
    targets: &[SamplingTarget],
    rng: &mut R,
) -> Result<Vec<SampledPoint>> {
    let country_index = layer.require_field(COUNTRY)?;
    let mut accepted = Vec::new();
    for target in targets {
        let Some((label, area)) = dissolve(layer, country_index, &target.country) else {
            tracing::warn!(country = %target.country, "no polygons for sampling target");
            continue;
        };
        let Some(centre) = area.centroid() else {
            tracing::warn!(country = %target.country, "country geometry has no centroid");
            continue;
        };

        let before = accepted.len();
        let radius = target.radius;
        for _ in 0..target.points {
            let x = rng.random_range((centre.x() - radius)..(centre.x() + radius));
            let y = rng.random_range((centre.y() - radius)..(centre.y() + radius));
            if area.contains(&Point::new(x, y)) {
                accepted.push(SampledPoint {
                    country: label.clone(),
                    x,
                    y,
                });
            }
        }
        tracing::info!(
            country = %label,
            drawn = target.points,
            kept = accepted.len() - before,
            "sampled random points"
        );
    }
    Ok(accepted)
}

/// `x`, `y` table of sampled points.
pub fn points_frame(points: &[SampledPoint]) -> Result<DataFrame> {
    let xs = points.iter().map(|p| Some(p.x)).collect();
    let ys = points.iter().map(|p| Some(p.y)).collect();
    Ok(DataFrame::new(vec![float_column("x", xs), float_column("y", ys)])?)
}
