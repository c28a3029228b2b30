//! Pipeline configuration (`Config.json`).
//!
//! Only `Method2_CountryEUI` is required. The remaining sections default to
//! the values the bank reports were produced with.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// ISO codes of countries that use the country-specific EUI method.
    #[serde(rename = "Method2_CountryEUI")]
    pub country_eui: Vec<String>,

    #[serde(rename = "BackFill", default)]
    pub back_fill: BackFillConfig,

    #[serde(rename = "TrimOverlap", default)]
    pub trim_overlap: TrimConfig,

    #[serde(rename = "RandomPoints", default = "default_sampling_targets")]
    pub random_points: Vec<SamplingTarget>,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.trim_overlap.threshold > 0.0 && self.trim_overlap.threshold <= 1.0) {
            return Err(ModelError::InvalidConfig {
                reason: format!(
                    "TrimOverlap.Threshold must be in (0, 1], got {}",
                    self.trim_overlap.threshold
                ),
            });
        }
        if let Some(code) = self
            .country_eui
            .iter()
            .find(|code| code.trim().is_empty() || code.contains('-'))
        {
            return Err(ModelError::InvalidConfig {
                reason: format!("Method2_CountryEUI entry '{code}' is not a country code"),
            });
        }
        for target in &self.random_points {
            if !(target.radius.is_finite() && target.radius > 0.0) {
                return Err(ModelError::InvalidConfig {
                    reason: format!("RandomPoints radius for {} must be positive", target.country),
                });
            }
        }
        Ok(())
    }
}

/// Back-fill of missing EUI values after merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackFillConfig {
    /// `COUNTRY` value whose column means fill the gaps.
    #[serde(rename = "ReferenceCountry")]
    pub reference_country: String,
    #[serde(rename = "Columns")]
    pub columns: Vec<String>,
}

impl Default for BackFillConfig {
    fn default() -> Self {
        Self {
            reference_country: "TW-臺灣".to_string(),
            columns: vec![
                "EUI_01".to_string(),
                "EUI_10".to_string(),
                "EUI_20".to_string(),
            ],
        }
    }
}

/// Optional removal of near-duplicate polygons after merging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimConfig {
    #[serde(rename = "Enabled")]
    pub enabled: bool,
    /// Overlap share of either polygon above which the pair is a duplicate.
    #[serde(rename = "Threshold")]
    pub threshold: f64,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: 0.8,
        }
    }
}

/// Random point sampling around one country's centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingTarget {
    /// ISO prefix of the `COUNTRY` attribute.
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Points")]
    pub points: usize,
    /// Half side of the sampling square, in degrees.
    #[serde(rename = "Radius")]
    pub radius: f64,
}

impl SamplingTarget {
    pub fn new(country: &str, points: usize, radius: f64) -> Self {
        Self {
            country: country.to_string(),
            points,
            radius,
        }
    }
}

pub fn default_sampling_targets() -> Vec<SamplingTarget> {
    vec![
        SamplingTarget::new("TW", 100, 1.5),
        SamplingTarget::new("JP", 1000, 10.0),
        SamplingTarget::new("US", 4000, 50.0),
        SamplingTarget::new("CN", 800, 30.0),
        SamplingTarget::new("SG", 100, 0.1),
        SamplingTarget::new("HK", 100, 0.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "Method2_CountryEUI": ["US", "JP"] }"#).unwrap();
        assert_eq!(config.country_eui, vec!["US", "JP"]);
        assert_eq!(config.back_fill, BackFillConfig::default());
        assert!(!config.trim_overlap.enabled);
        assert_eq!(config.trim_overlap.threshold, 0.8);
        assert_eq!(config.random_points.len(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "Method2_CountryEUI": ["US"],
            "BackFill": { "ReferenceCountry": "JP-日本", "Columns": ["EUI_05"] },
            "TrimOverlap": { "Enabled": true, "Threshold": 0.5 },
            "RandomPoints": [ { "Country": "TW", "Points": 10, "Radius": 1.0 } ]
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.back_fill.reference_country, "JP-日本");
        assert!(config.trim_overlap.enabled);
        assert_eq!(config.random_points, vec![SamplingTarget::new("TW", 10, 1.0)]);
    }

    #[test]
    fn test_missing_country_list_is_an_error() {
        assert!(serde_json::from_str::<PipelineConfig>("{}").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config: PipelineConfig =
            serde_json::from_str(r#"{ "Method2_CountryEUI": ["US-美國"] }"#).unwrap();
        assert!(config.validate().is_err());
        config.country_eui = vec!["US".into()];
        config.trim_overlap.threshold = 1.5;
        assert!(config.validate().is_err());
    }
}
