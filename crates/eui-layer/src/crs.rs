//! Coordinate reference handling.
//!
//! Layers are held in geographic WGS84 degrees. Sources in Web Mercator are
//! inverse-projected on read, and overlap areas are measured after a forward
//! projection to Web Mercator metres.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::path::Path;

use geo::{Coord, MapCoords, MultiPolygon};

use crate::error::{LayerError, Result};

/// WGS84 semi-major axis in metres.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator square.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_6;

/// WKT written next to every output shapefile.
pub const WGS84_WKT: &str = concat!(
    r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984","#,
    r#"SPHEROID["WGS_1984",6378137.0,298.257223563]],"#,
    r#"PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#
);

/// Reference systems a layer can be normalised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// Longitude/latitude degrees on any datum close enough to WGS84.
    Geographic,
    /// EPSG:3857 metres.
    WebMercator,
}

impl Crs {
    /// Classifies a `.prj` WKT string.
    pub fn from_wkt(wkt: &str) -> Option<Self> {
        let upper = wkt.trim().to_ascii_uppercase();
        if upper.starts_with("GEOGCS") {
            return Some(Self::Geographic);
        }
        let web_mercator = upper.starts_with("PROJCS")
            && upper.contains("MERCATOR")
            && ["3857", "PSEUDO", "WEB_MERCATOR", "AUXILIARY_SPHERE", "POPULAR"]
                .iter()
                .any(|marker| upper.contains(marker));
        web_mercator.then_some(Self::WebMercator)
    }

    /// Reads the `.prj` next to `shp_path`.
    ///
    /// A missing `.prj` is treated as geographic.
    pub fn detect(shp_path: &Path) -> Result<Self> {
        let prj = shp_path.with_extension("prj");
        if !prj.exists() {
            tracing::warn!(path = %shp_path.display(), "no .prj file, assuming WGS84");
            return Ok(Self::Geographic);
        }
        let wkt = std::fs::read_to_string(&prj).map_err(|source| LayerError::Io {
            path: prj.clone(),
            source,
        })?;
        Self::from_wkt(&wkt).ok_or_else(|| LayerError::UnsupportedCrs {
            path: prj,
            detail: wkt.chars().take(60).collect(),
        })
    }

    /// Converts a geometry in this system to WGS84 degrees.
    pub fn to_wgs84(self, geometry: MultiPolygon<f64>) -> MultiPolygon<f64> {
        match self {
            Self::Geographic => geometry,
            Self::WebMercator => geometry.map_coords(mercator_to_wgs84),
        }
    }
}

/// Forward Web Mercator projection of a longitude/latitude coordinate.
pub fn wgs84_to_mercator(coord: Coord<f64>) -> Coord<f64> {
    let latitude = coord
        .y
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
        .to_radians();
    Coord {
        x: EARTH_RADIUS * coord.x.to_radians(),
        y: EARTH_RADIUS * (FRAC_PI_4 + latitude / 2.0).tan().ln(),
    }
}

/// Inverse Web Mercator projection.
pub fn mercator_to_wgs84(coord: Coord<f64>) -> Coord<f64> {
    Coord {
        x: (coord.x / EARTH_RADIUS).to_degrees(),
        y: (2.0 * (coord.y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees(),
    }
}

/// Projects a WGS84 geometry to Web Mercator metres.
pub fn project_to_mercator(geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    geometry.map_coords(wgs84_to_mercator)
}
