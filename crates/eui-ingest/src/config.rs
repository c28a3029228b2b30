//! `Config.json` loading.

use std::path::Path;

use eui_common::TextEncoding;
use eui_model::PipelineConfig;

use crate::error::{IngestError, Result};
use crate::table::read_text;

/// Loads and validates the pipeline configuration.
pub fn load_pipeline_config(path: &Path) -> Result<PipelineConfig> {
    let text = read_text(path, TextEncoding::Utf8)?;
    let config: PipelineConfig =
        serde_json::from_str(&text).map_err(|source| IngestError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate().map_err(|source| IngestError::Model {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        countries = ?config.country_eui,
        "loaded configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_pipeline_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Config.json");
        std::fs::write(&path, r#"{"Method2_CountryEUI": ["US", "JP"]}"#).unwrap();
        let config = load_pipeline_config(&path).unwrap();
        assert_eq!(config.country_eui, vec!["US", "JP"]);
    }

    #[test]
    fn test_load_pipeline_config_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(
            load_pipeline_config(&path),
            Err(IngestError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_load_pipeline_config_invalid_threshold() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Config.json");
        std::fs::write(
            &path,
            r#"{"Method2_CountryEUI": [], "TrimOverlap": {"Enabled": true, "Threshold": 0}}"#,
        )
        .unwrap();
        assert!(matches!(
            load_pipeline_config(&path),
            Err(IngestError::Model { .. })
        ));
    }
}
