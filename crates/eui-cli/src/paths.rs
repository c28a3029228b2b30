//! Conventional file locations under the data root.
//!
//! Every stage reads and writes fixed paths relative to one root directory,
//! laid out per region:
//!
//! ```text
//! <root>/Japan/data/...            survey and mapping configuration
//! <root>/Japan/output/...          grouped means, mapping tables, layer
//! <root>/US/...                    same layout for the US method
//! <root>/Basic_Coef/...            world boundaries and reference tables
//! <root>/Layer_Output/Config.json  merge configuration
//! <root>/Layer_Output/output/...   merged layer, CSV and random points
//! ```

use std::path::{Path, PathBuf};

/// Region directory of the basic coefficient method.
pub const BASIC_REGION: &str = "Basic_Coef";
/// Layer name suffix of the basic coefficient layer.
pub const BASIC_SUFFIX: &str = "Basic_Coef";
/// Region directory of the Japan method.
pub const JAPAN_REGION: &str = "Japan";
/// Region directory of the US method.
pub const US_REGION: &str = "US";
/// Region directory of the merge step.
pub const MERGE_REGION: &str = "Layer_Output";

const LAYER_NAME: &str = "EUI.Prediction.CTBC.Global";

/// Root of the pipeline's data tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRoot {
    root: PathBuf,
}

impl DataRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    fn data(&self, region: &str) -> PathBuf {
        self.root.join(region).join("data")
    }

    fn output_data(&self, region: &str) -> PathBuf {
        self.root.join(region).join("output").join("output_data")
    }

    // === Japan ===

    pub fn decc_source(&self) -> PathBuf {
        self.data(JAPAN_REGION).join("DECC").join("DECC.csv")
    }

    pub fn decc_output(&self) -> PathBuf {
        self.output_data(JAPAN_REGION)
            .join("DECC")
            .join("DECC.BuildingType_Mean.csv")
    }

    pub fn japan_space_config(&self) -> PathBuf {
        self.data(JAPAN_REGION)
            .join("Mapping.Config")
            .join("Mapping.CTBC.Space.Config.csv")
    }

    pub fn japan_collateral_config(&self) -> PathBuf {
        self.data(JAPAN_REGION)
            .join("Mapping.Config")
            .join("Mapping.CTBC.Collateral.Config.csv")
    }

    pub fn japan_space_output(&self) -> PathBuf {
        self.output_data(JAPAN_REGION)
            .join("Mapping.CTBC")
            .join("Mapping.CTBC.Space.Mean.csv")
    }

    pub fn japan_collateral_output(&self) -> PathBuf {
        self.output_data(JAPAN_REGION)
            .join("Mapping.CTBC")
            .join("Mapping.CTBC.Collateral.Mean.csv")
    }

    pub fn japan_prefectures(&self) -> PathBuf {
        self.data(JAPAN_REGION)
            .join("Shapefile.Prefectures")
            .join("Prefectures.shp")
    }

    // === US ===

    pub fn us_projection(&self) -> PathBuf {
        // "Cliamte" is the file name as published
        self.data(US_REGION)
            .join("EUI_ClimateAdjusted")
            .join("EUI_CliamteProjection.csv")
    }

    pub fn us_energy_star(&self) -> PathBuf {
        self.data(US_REGION)
            .join("EUI_EnergyStar")
            .join("EUI_EnergyStar.csv")
    }

    pub fn us_adjusted_output(&self) -> PathBuf {
        self.output_data(US_REGION)
            .join("EUI_ClimateAdjusted")
            .join("EUI_ClimateAdjusted.csv")
    }

    pub fn us_mapping_config(&self) -> PathBuf {
        self.data(US_REGION)
            .join("Mapping.Config")
            .join("Mapping.CTBC.Config.csv")
    }

    pub fn us_mapping_output(&self) -> PathBuf {
        self.output_data(US_REGION)
            .join("Mapping.CTBC")
            .join("Mapping.CTBC.Mean.csv")
    }

    pub fn us_counties(&self) -> PathBuf {
        self.data(US_REGION)
            .join("Shapefile.County")
            .join("Building_America_and_IECC_Climate_Zones_by_US_County_Boundaries.shp")
    }

    // === Basic coefficient method ===

    pub fn world_boundaries(&self) -> PathBuf {
        self.data(BASIC_REGION)
            .join("Shapefile")
            .join("world-administrative-boundaries")
            .join("world-administrative-boundaries.shp")
    }

    pub fn carbon_intensity(&self) -> PathBuf {
        self.data(BASIC_REGION)
            .join("Coef_CarbonIntensity_Electricity")
            .join("Coef_CarbonIntensity_Electricity.csv")
    }

    pub fn eewh_space_means(&self) -> PathBuf {
        self.data(BASIC_REGION)
            .join("EEWH_EUI")
            .join("Mapping.CTBC.Space.Mean.csv")
    }

    pub fn eewh_collateral_means(&self) -> PathBuf {
        self.data(BASIC_REGION)
            .join("EEWH_EUI")
            .join("Mapping.CTBC.Collateral.Mean.csv")
    }

    pub fn singapore_eui(&self) -> PathBuf {
        self.data(BASIC_REGION).join("EUI_SG").join("EUI_SG.csv")
    }

    // === Layers ===

    /// Layer directory of a region.
    pub fn layer_dir(&self, region: &str) -> PathBuf {
        self.root
            .join(region)
            .join("output")
            .join("output_result")
            .join("Shapefile")
            .join(LAYER_NAME)
    }

    /// `<region>/.../EUI.Prediction.CTBC.Global.<suffix>.shp`
    pub fn layer_path(&self, region: &str, suffix: &str) -> PathBuf {
        self.layer_dir(region)
            .join(format!("{LAYER_NAME}.{suffix}.shp"))
    }

    /// Layer directory of a country using the country-specific method.
    pub fn country_layer_dir(&self, iso: &str) -> PathBuf {
        self.layer_dir(country_region(iso))
    }

    // === Merge ===

    pub fn config(&self) -> PathBuf {
        self.root.join(MERGE_REGION).join("Config.json")
    }

    fn merge_output(&self) -> PathBuf {
        self.root.join(MERGE_REGION).join("output")
    }

    pub fn merged_csv(&self) -> PathBuf {
        self.merge_output().join(format!("{LAYER_NAME}.csv"))
    }

    pub fn merged_layer(&self) -> PathBuf {
        self.layer_dir(MERGE_REGION).join(format!("{LAYER_NAME}.shp"))
    }

    pub fn random_points_csv(&self) -> PathBuf {
        self.merge_output()
            .join("RandomPoints")
            .join(format!("{LAYER_NAME}.RandomPoints.csv"))
    }

    pub fn random_points_layer(&self) -> PathBuf {
        self.merge_output()
            .join("RandomPoints")
            .join(format!("{LAYER_NAME}.RandomPoints.shp"))
    }
}

impl Default for DataRoot {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Region directory holding a country's layer. Japan lives under `Japan`,
/// every other country under its ISO code.
pub fn country_region(iso: &str) -> &str {
    match iso {
        "JP" => JAPAN_REGION,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_paths() {
        let root = DataRoot::new("/data");
        assert_eq!(
            root.layer_path(US_REGION, "US-美國"),
            PathBuf::from(
                "/data/US/output/output_result/Shapefile/EUI.Prediction.CTBC.Global/\
                 EUI.Prediction.CTBC.Global.US-美國.shp"
            )
        );
        assert_eq!(
            root.merged_layer(),
            PathBuf::from(
                "/data/Layer_Output/output/output_result/Shapefile/\
                 EUI.Prediction.CTBC.Global/EUI.Prediction.CTBC.Global.shp"
            )
        );
    }

    #[test]
    fn test_country_layer_dir() {
        let root = DataRoot::new("/data");
        assert_eq!(root.country_layer_dir("JP"), root.layer_dir("Japan"));
        assert_eq!(root.country_layer_dir("US"), root.layer_dir("US"));
    }

    #[test]
    fn test_stage_outputs_feed_next_stage() {
        let root = DataRoot::new("r");
        assert!(root.decc_output().starts_with("r/Japan/output/output_data"));
        assert_eq!(
            root.merged_csv(),
            PathBuf::from("r/Layer_Output/output/EUI.Prediction.CTBC.Global.csv")
        );
    }
}
