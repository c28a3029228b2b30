//! Mapping configuration tables.

use std::path::Path;

use eui_common::TextEncoding;
use eui_model::columns::{
    COLLATERAL_CODE, COLLATERAL_NAME, SPACE_CODE, SPACE_NAME, SPACE_SOURCES, US_SOURCES,
};
use eui_model::{ListStyle, MappingRule, SourceSpec, normalize_code, normalize_collateral_code};

use crate::error::{IngestError, Result};
use crate::table::{column_strings, read_text_table, require_columns};

/// Layout of one mapping configuration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingColumns {
    pub code: &'static str,
    pub label: &'static str,
    pub sources: &'static str,
    pub style: ListStyle,
    /// Target codes are collateral codes and get zero-padded.
    pub collateral: bool,
}

/// DECC building type index to space class.
pub const SPACE_MAPPING: MappingColumns = MappingColumns {
    code: SPACE_CODE,
    label: SPACE_NAME,
    sources: SPACE_SOURCES,
    style: ListStyle::CommaSeparated,
    collateral: false,
};

/// Space class to collateral class.
pub const COLLATERAL_MAPPING: MappingColumns = MappingColumns {
    code: COLLATERAL_CODE,
    label: COLLATERAL_NAME,
    sources: SPACE_CODE,
    style: ListStyle::CommaSeparated,
    collateral: true,
};

/// US climate-adjusted building type to collateral class.
pub const US_MAPPING: MappingColumns = MappingColumns {
    code: COLLATERAL_CODE,
    label: COLLATERAL_NAME,
    sources: US_SOURCES,
    style: ListStyle::AlwaysList,
    collateral: true,
};

/// Loads mapping rules in file order. Fully blank rows are skipped.
pub fn load_mapping_rules(path: &Path, columns: &MappingColumns) -> Result<Vec<MappingRule>> {
    let df = read_text_table(path, TextEncoding::Utf8)?;
    require_columns(&df, &[columns.code, columns.label, columns.sources], path)?;

    let codes = column_strings(&df, columns.code, path)?;
    let labels = column_strings(&df, columns.label, path)?;
    let sources = column_strings(&df, columns.sources, path)?;

    let mut rules = Vec::with_capacity(codes.len());
    for ((code, label), raw_sources) in codes.into_iter().zip(labels).zip(sources) {
        if code.is_empty() && label.is_empty() && raw_sources.is_empty() {
            continue;
        }
        let target_code = if columns.collateral {
            normalize_collateral_code(&code)
        } else {
            normalize_code(&code)
        };
        let spec = SourceSpec::parse(&raw_sources, columns.style);
        let rule = MappingRule::new(target_code, label, spec).map_err(|source| IngestError::Model {
            path: path.to_path_buf(),
            source,
        })?;
        rules.push(rule);
    }

    tracing::debug!(path = %path.display(), rules = rules.len(), "loaded mapping rules");
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_space_rules() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("space.csv");
        std::fs::write(
            &path,
            "空間代號,使用空間名稱,建築能耗原始分區\nA1,辦公空間,8\nA2,綜合,\"3, 7, 9\"\nA3,未知,\n,,\n",
        )
        .unwrap();

        let rules = load_mapping_rules(&path, &SPACE_MAPPING).unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].sources, SourceSpec::Single("8".into()));
        assert_eq!(
            rules[1].sources,
            SourceSpec::List(vec!["3".into(), "7".into(), "9".into()])
        );
        assert_eq!(rules[2].sources, SourceSpec::Unmapped);
    }

    #[test]
    fn test_load_collateral_rules_pads_codes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("collateral.csv");
        std::fs::write(&path, "擔保品細項,細項名稱,空間代號\n5,住宅,A1\n12.0,廠房,\"A2, A3\"\n").unwrap();

        let rules = load_mapping_rules(&path, &COLLATERAL_MAPPING).unwrap();
        assert_eq!(rules[0].target_code, "05");
        assert_eq!(rules[1].target_code, "12");
    }

    #[test]
    fn test_load_us_rules_single_code_is_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("us.csv");
        std::fs::write(&path, "擔保品細項,細項名稱,2022能耗分區\n1,辦公,H2\n2,空地,\n").unwrap();

        let rules = load_mapping_rules(&path, &US_MAPPING).unwrap();
        assert_eq!(rules[0].sources, SourceSpec::List(vec!["H2".into()]));
        assert_eq!(rules[1].sources, SourceSpec::Unmapped);
    }

    #[test]
    fn test_rule_without_code_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "空間代號,使用空間名稱,建築能耗原始分區\n,辦公,1\n").unwrap();
        assert!(matches!(
            load_mapping_rules(&path, &SPACE_MAPPING),
            Err(IngestError::Model { .. })
        ));
    }
}
