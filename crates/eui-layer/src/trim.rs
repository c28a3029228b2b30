//! Removal of near-duplicate polygons.
//!
//! Two polygons are duplicates when their intersection covers more than the
//! threshold share of either one. Areas are compared in Web Mercator metres.

use geo::{Area, BooleanOps, BoundingRect, Intersects, MultiPolygon, Rect};

use crate::crs::project_to_mercator;
use crate::layer::Layer;

/// Outcome of [`trim_overlaps`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrimReport {
    /// Pairs whose bounding boxes intersected.
    pub pairs_checked: usize,
    /// Indices of removed features in the untrimmed layer.
    pub dropped: Vec<usize>,
}

/// Share of each polygon covered by their intersection.
pub fn overlap_ratios(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> (f64, f64) {
    let overlap = a.intersection(b).unsigned_area();
    let ratio = |area: f64| if area > 0.0 { overlap / area } else { 0.0 };
    (ratio(a.unsigned_area()), ratio(b.unsigned_area()))
}

/// Drops the smaller member of every duplicate pair.
///
/// Pairs are visited in index order and features already dropped are
/// skipped; when both areas are equal the later feature is dropped.
/// Attribute values are never changed.
pub fn trim_overlaps(layer: &mut Layer, threshold: f64) -> TrimReport {
    let projected: Vec<MultiPolygon<f64>> = layer
        .features
        .iter()
        .map(|feature| project_to_mercator(&feature.geometry))
        .collect();
    let areas: Vec<f64> = projected.iter().map(Area::unsigned_area).collect();
    let bounds: Vec<Option<Rect<f64>>> = projected
        .iter()
        .map(BoundingRect::bounding_rect)
        .collect();

    let mut report = TrimReport::default();
    let mut dropped = vec![false; projected.len()];
    for i in 0..projected.len() {
        let Some(bound_i) = bounds[i] else { continue };
        for j in (i + 1)..projected.len() {
            if dropped[i] {
                break;
            }
            if dropped[j] {
                continue;
            }
            let Some(bound_j) = bounds[j] else { continue };
            if !bound_i.intersects(&bound_j) {
                continue;
            }
            report.pairs_checked += 1;
            let (ratio_i, ratio_j) = overlap_ratios(&projected[i], &projected[j]);
            if ratio_i > threshold || ratio_j > threshold {
                let (kept, loser) = if areas[j] <= areas[i] { (i, j) } else { (j, i) };
                dropped[loser] = true;
                tracing::debug!(
                    kept,
                    dropped = loser,
                    ratio_i,
                    ratio_j,
                    "dropping overlapping polygon"
                );
            }
        }
    }

    report.dropped = dropped
        .iter()
        .enumerate()
        .filter_map(|(index, &drop)| drop.then_some(index))
        .collect();
    let mut flags = dropped.into_iter();
    layer.retain(|_| !flags.next().unwrap_or(false));

    tracing::info!(
        threshold,
        pairs = report.pairs_checked,
        dropped = report.dropped.len(),
        remaining = layer.len(),
        "trimmed overlapping polygons"
    );
    report
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;
    use crate::layer::{AttrValue, Field};

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ]])
    }

    fn layer(squares: &[(f64, f64, f64)]) -> Layer {
        let mut layer = Layer::new(vec![Field::text("REGNAME")]);
        for (i, (x, y, size)) in squares.iter().enumerate() {
            layer
                .push(square(*x, *y, *size), vec![AttrValue::text(format!("r{i}"))])
                .unwrap();
        }
        layer
    }

    fn names(layer: &Layer) -> Vec<String> {
        layer
            .column_text("REGNAME")
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    #[test]
    fn test_contained_polygon_dropped() {
        // r1 lies inside r0; r2 is disjoint
        let mut layer = layer(&[(0.0, 0.0, 2.0), (0.5, 0.5, 1.0), (10.0, 10.0, 1.0)]);
        let report = trim_overlaps(&mut layer, 0.8);
        assert_eq!(report.dropped, vec![1]);
        assert_eq!(names(&layer), ["r0", "r2"]);
    }

    #[test]
    fn test_small_overlap_kept() {
        let mut layer = layer(&[(0.0, 0.0, 1.0), (0.9, 0.0, 1.0)]);
        let report = trim_overlaps(&mut layer, 0.8);
        assert!(report.dropped.is_empty());
        assert_eq!(report.pairs_checked, 1);
        assert_eq!(layer.len(), 2);
    }

    #[test]
    fn test_equal_areas_drop_later() {
        let mut layer = layer(&[(0.0, 0.0, 1.0), (0.0, 0.0, 1.0)]);
        let report = trim_overlaps(&mut layer, 0.8);
        assert_eq!(report.dropped, vec![1]);
        assert_eq!(names(&layer), ["r0"]);
    }

    #[test]
    fn test_dropped_polygon_not_revisited() {
        // r0 is dropped against r1; the r0/r2 pair is never compared
        let mut layer = layer(&[(0.1, 0.1, 0.8), (0.0, 0.0, 1.0), (0.1, 0.1, 0.8)]);
        let report = trim_overlaps(&mut layer, 0.8);
        assert_eq!(report.dropped, vec![0, 2]);
        assert_eq!(names(&layer), ["r1"]);
    }

    #[test]
    fn test_overlap_ratios() {
        let (a, b) = overlap_ratios(&square(0.0, 0.0, 2.0), &square(0.0, 0.0, 1.0));
        assert!((a - 0.25).abs() < 1e-9);
        assert!((b - 1.0).abs() < 1e-9);
    }
}
