//! Mapping rules from source categories to bank classification codes.
//!
//! Each configuration row names a target code and either one source code, a
//! comma-separated list of source codes, or nothing. How a single code is
//! treated depends on the table: the Japanese configs only build an average
//! when several codes are listed, the US config always does.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// How a source cell without a comma is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ListStyle {
    /// Only cells containing a comma are lists.
    #[default]
    CommaSeparated,
    /// Every non-empty cell is a list, even with one entry.
    AlwaysList,
}

/// Source side of a mapping rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceSpec {
    /// No source category; the target gets a placeholder row.
    Unmapped,
    /// One-to-one mapping.
    Single(String),
    /// Average of several source codes, followed by their detail rows.
    List(Vec<String>),
}

impl SourceSpec {
    /// Parses a raw configuration cell.
    pub fn parse(raw: &str, style: ListStyle) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return Self::Unmapped;
        }
        let codes: Vec<String> = trimmed
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(normalize_code)
            .collect();
        match (style, codes.len()) {
            (_, 0) => Self::Unmapped,
            (ListStyle::CommaSeparated, 1) if !trimmed.contains(',') => {
                Self::Single(codes.into_iter().next().unwrap_or_default())
            }
            _ => Self::List(codes),
        }
    }

    /// Source codes referenced by the rule, in configuration order.
    pub fn codes(&self) -> &[String] {
        match self {
            Self::Unmapped => &[],
            Self::Single(code) => std::slice::from_ref(code),
            Self::List(codes) => codes,
        }
    }
}

/// One row of a mapping configuration table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    pub target_code: String,
    pub target_label: String,
    pub sources: SourceSpec,
}

impl MappingRule {
    pub fn new(
        target_code: impl Into<String>,
        target_label: impl Into<String>,
        sources: SourceSpec,
    ) -> Result<Self> {
        let target_code = target_code.into();
        if target_code.trim().is_empty() {
            return Err(ModelError::InvalidMappingRule {
                target: target_code,
                reason: "empty target code".to_string(),
            });
        }
        Ok(Self {
            target_code,
            target_label: target_label.into(),
            sources,
        })
    }
}

/// Normalises a code read from a spreadsheet export.
///
/// Integer codes stored as floats (`"3.0"`) lose their fractional part.
pub fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_suffix(".0") {
        Some(int) if !int.is_empty() && int.chars().all(|c| c.is_ascii_digit()) => int.to_string(),
        _ => trimmed.to_string(),
    }
}

/// Normalises a collateral code to at least two zero-padded digits.
///
/// Non-numeric codes are returned trimmed but otherwise unchanged.
pub fn normalize_collateral_code(raw: &str) -> String {
    let code = normalize_code(raw);
    if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) {
        format!("{code:0>2}")
    } else {
        code
    }
}
