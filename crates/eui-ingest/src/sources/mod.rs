//! Typed loaders for each source table.

mod basic;
mod classified;
mod decc;
mod mapping;
mod us;

pub use basic::{load_carbon_intensity, load_eewh_means, load_last_column};
pub use classified::load_classified_table;
pub use decc::{load_decc_observations, load_decc_region_means};
pub use mapping::{
    COLLATERAL_MAPPING, MappingColumns, SPACE_MAPPING, US_MAPPING, load_mapping_rules,
};
pub use us::{load_climate_adjusted, load_climate_projection, load_energy_star};
