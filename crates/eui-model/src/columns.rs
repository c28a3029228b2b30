//! Column headers of the source and output tables.
//!
//! Headers are part of the file contract with the bank's downstream
//! workbooks, so they are kept verbatim (Japanese for the DECC survey,
//! Traditional Chinese for everything the pipeline writes).

// =============================================================================
// DECC survey
// =============================================================================

pub const DECC_BUILDING_TYPE: &str = "建物用途";
pub const DECC_IDENTIFIER: &str = "建物ID";
pub const DECC_ELECTRICITY_SOURCE: &str = "電力_年合計(kWh/㎡・年)";
pub const DECC_PRIMARY_ENERGY_SOURCE: &str = "一次エネルギー原単位_MJ/㎡・年";

/// Electricity metric after renaming.
pub const DECC_ELECTRICITY: &str = "電力年合計(kWh/㎡・年)";
/// Primary energy metric after conversion to kWh.
pub const DECC_PRIMARY_ENERGY: &str = "一次エネルギー原単位_kWh/㎡・年";

/// Running index inserted in front of translated tables.
pub const BUILDING_TYPE_INDEX: &str = "建物用途序號";

pub const MEAN_PREFIX: &str = "Mean_";
pub const COUNT_PREFIX: &str = "nSample_";

// =============================================================================
// Mapping configuration and outputs
// =============================================================================

pub const SPACE_CODE: &str = "空間代號";
pub const SPACE_NAME: &str = "使用空間名稱";
pub const SPACE_SOURCES: &str = "建築能耗原始分區";

pub const COLLATERAL_CODE: &str = "擔保品細項";
pub const COLLATERAL_NAME: &str = "細項名稱";

pub const US_SOURCES: &str = "2022能耗分區";
pub const US_SECTOR: &str = "建物分類";

/// Prefix of every EUI value column.
pub const EUI_PREFIX: &str = "EUI_";
/// Single value column of the EEWH reference tables.
pub const EUI_MEAN: &str = "EUI_Mean";

// =============================================================================
// US sources
// =============================================================================

pub const PROJECTION_SECTOR: &str = "Sector";
pub const PROJECTION_ZONE: &str = "Zone";
pub const PROJECTION_EUI: &str = "EUI [kWh/m2.yr] (% growth) 2010";

pub const ENERGY_STAR_SECTOR: &str = "Market Sector";
pub const ENERGY_STAR_PROPERTY: &str = "Property type";
pub const ENERGY_STAR_EUI: &str = "Site EUI (kBtu/ft2)";

// =============================================================================
// Layers
// =============================================================================

pub const COUNTRY: &str = "COUNTRY";
pub const REGNAME: &str = "REGNAME";
pub const COEF_CIE: &str = "Coef_CIE";
pub const CLIMATEZONE: &str = "CLIMATEZONE";

pub const CARBON_ISO: &str = "國家/地區代號";
pub const CARBON_COEF: &str = "電力排碳係數_公斤CO2e/度";

/// `EUI_<suffix>` column name.
pub fn eui_column(suffix: &str) -> String {
    format!("{EUI_PREFIX}{suffix}")
}
