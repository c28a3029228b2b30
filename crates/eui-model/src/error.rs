//! Error types for the domain model.

use thiserror::Error;

/// Errors raised while interpreting domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// An IECC climate code that no coarse zone covers.
    #[error("unknown IECC climate zone '{code}'")]
    UnknownClimateZone { code: String },

    /// A coarse climate zone name not in the zone table.
    #[error("unknown climate zone name '{name}'")]
    UnknownZoneName { name: String },

    /// A prefecture name not in the prefecture table.
    #[error("unknown prefecture '{name}'")]
    UnknownPrefecture { name: String },

    /// A mapping configuration row that cannot be interpreted.
    #[error("invalid mapping rule for '{target}': {reason}")]
    InvalidMappingRule { target: String, reason: String },

    /// A configuration value outside its allowed range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Values do not line up with the declared columns.
    #[error("row '{key}' has {actual} values but {expected} columns are declared")]
    ShapeMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::UnknownClimateZone {
            code: "9Z".to_string(),
        };
        assert_eq!(err.to_string(), "unknown IECC climate zone '9Z'");
    }
}
