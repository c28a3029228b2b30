//! Domain model for the EUI collateral mapping pipeline.
//!
//! The pipeline turns building survey statistics into energy-use-intensity
//! (EUI) values per bank classification code and region:
//!
//! 1. [`ObservationTable`]: raw per-building measurements
//! 2. [`GroupTable`]: mean and sample count per (building type, region bucket)
//! 3. [`ClassifiedTable`]: values re-aggregated onto space or collateral classes
//!    through [`MappingRule`]s
//! 4. [`ClassLookup`]: per-region values keyed for polygon joins
//!
//! Static lookup data (region buckets, prefectures, IECC climate zones,
//! territory fixes, label translations) lives in explicit constant tables so
//! exhaustiveness can be checked in tests.

pub mod classified;
pub mod columns;
pub mod climate;
pub mod config;
pub mod error;
pub mod group;
pub mod labels;
pub mod lookup;
pub mod mapping;
pub mod observation;
pub mod reference;
pub mod region;
pub mod territory;

pub use classified::{
    AGGREGATE_LABEL, ClassifiedRow, ClassifiedTable, RowKind, SourceRow, SourceTable,
};
pub use climate::{CoarseClimateZone, IECC_ZONE_TABLE, reduce_iecc_zone};
pub use config::{
    BackFillConfig, PipelineConfig, SamplingTarget, TrimConfig, default_sampling_targets,
};
pub use error::{ModelError, Result};
pub use group::{GroupRow, GroupStat, GroupTable};
pub use lookup::ClassLookup;
pub use mapping::{ListStyle, MappingRule, SourceSpec, normalize_code, normalize_collateral_code};
pub use observation::{ObservationTable, RawObservation};
pub use reference::{EnergyStarRecord, ProjectionRecord};
pub use region::{PREFECTURES, Prefecture, RegionBucket, prefecture_region};
pub use territory::{
    DROPPED_TERRITORIES, EXCLUDED_ISO_CODES, TERRITORY_ISO_FIXES, territory_iso_fix,
};
