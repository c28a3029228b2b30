//! EUI table transforms.
//!
//! Pure functions over the domain types of `eui-model`:
//!
//! - **Units**: MJ→kWh and kBtu/ft²→kWh/m² conversion
//! - **Aggregation**: mean and count per (building type, region bucket)
//! - **Fill**: missing means from the type's mean, missing counts to zero
//! - **Climate adjustment**: Energy Star EUIs scaled by zone factors
//! - **Mapping**: hierarchical re-aggregation onto classification codes
//! - **Lookup**: pivot of summary rows for polygon joins
//! - **Output**: DataFrames rounded for writing
//!
//! # Example
//!
//! ```ignore
//! use eui_transform::{map_pass, summarize_decc, TargetColumns};
//!
//! let (grouped, _) = summarize_decc(observations)?;
//! let space = map_pass(&means, &space_rules, TargetColumns { code: "空間代號", label: "使用空間名稱" });
//! let collateral = map_pass(&space.clone().into_source(), &collateral_rules, target);
//! ```

mod aggregate;
mod climate;
mod decc;
mod error;
mod fill;
mod lookup;
mod mapping;
mod output;
mod units;

// Error type
pub use error::{Result, TransformError};

// Units
pub use units::{KBTU_PER_FT2_TO_KWH_PER_M2, MJ_TO_KWH, convert_metric, rename_metric};

// Aggregation and fill
pub use aggregate::group_by_bucket;
pub use decc::{DeccSummaryStats, summarize_decc};
pub use fill::{fill_missing_counts, fill_missing_means};

// Climate adjustment
pub use climate::{
    AdjustedRow, COMMERCIAL_SECTOR, ClimateAdjusted, RESIDENTIAL_MARKET_SECTOR,
    RESIDENTIAL_SECTOR, ZoneFactor, adjusted_source_table, climate_adjust, zone_column,
    zone_factors,
};

// Mapping
pub use mapping::{TargetColumns, map_pass};

// Lookup
pub use lookup::{constant_lookup, pivot_summary_rows, region_key, region_lookup};

// Output frames
pub use output::{OutputLanguage, classified_frame, group_table_frame, source_table_frame};
