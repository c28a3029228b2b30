//! Source table loading for the EUI mapping pipeline.
//!
//! This crate reads every input of the pipeline into domain types:
//!
//! - **CSV Loading**: decode (UTF-8 or Shift_JIS) and parse with every column
//!   as text, so classification codes keep their leading zeros
//! - **Layer Discovery**: find the shapefile of a country layer directory
//! - **Typed Loaders**: DECC survey, mapping configs, US projection and
//!   Energy Star tables, carbon intensity, EEWH means, stage read-back
//! - **Configuration**: `Config.json`
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use eui_common::TextEncoding;
//! use eui_ingest::{load_decc_observations, load_mapping_rules, SPACE_MAPPING};
//!
//! let survey = load_decc_observations(Path::new("Japan/data/DECC/DECC.csv"), TextEncoding::ShiftJis)?;
//! let rules = load_mapping_rules(Path::new("Mapping.CTBC.Space.Config.csv"), &SPACE_MAPPING)?;
//! ```

mod config;
mod discovery;
mod error;
mod sources;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use table::{
    column_floats, column_names, column_strings, parse_text_table, read_bytes, read_text,
    read_text_table, require_columns,
};

// === Layer Discovery ===
pub use discovery::{first_shapefile, list_shapefiles};

// === Typed Loaders ===
pub use sources::{
    COLLATERAL_MAPPING, MappingColumns, SPACE_MAPPING, US_MAPPING, load_carbon_intensity,
    load_classified_table, load_climate_adjusted, load_climate_projection,
    load_decc_observations, load_decc_region_means, load_eewh_means, load_energy_star,
    load_last_column, load_mapping_rules,
};

// === Configuration ===
pub use config::load_pipeline_config;
