//! Region polygon layers for the EUI mapping pipeline.
//!
//! - **Layers**: typed attribute fields over WGS84 multipolygons
//! - **Shapefile I/O**: read with CRS normalisation, write with a WGS84
//!   `.prj` and DBF-safe field names
//! - **Builders**: basic coefficient, US county and Japan prefecture layers
//! - **Merge**: global concatenation, exception back-fill, overlap trimming
//! - **Sampling**: seeded random points inside countries

pub mod basic;
pub mod crs;
mod error;
pub mod io;
pub mod japan;
mod join;
mod layer;
pub mod merge;
pub mod sample;
pub mod trim;
pub mod us;

/// Decimals kept in the basic coefficient layer.
pub const BASIC_DIGITS: u32 = 3;
/// Decimals kept in country-specific layers.
pub const REGION_DIGITS: u32 = 1;

// === Error Types ===
pub use error::{LayerError, Result};

// === Layer Model ===
pub use layer::{AttrValue, Feature, Field, FieldKind, Layer, country_iso};

// === Shapefile I/O ===
pub use crs::Crs;
pub use io::{attribute_frame, read_layer, write_csv, write_layer, write_points};

// === Builders ===
pub use basic::{BasicInputs, WorldMode, build_basic_layer};
pub use japan::{DEFAULT_PREFECTURE_FIELD, build_japan_layer};
pub use join::{attach_lookup, broadcast_lookup};
pub use us::build_us_layer;

// === Merge ===
pub use merge::{CountryLayer, MergeReport, back_fill, merge_layers};
pub use trim::{TrimReport, trim_overlaps};

// === Sampling ===
pub use sample::{SampledPoint, points_frame, random_points, seeded_rng};
