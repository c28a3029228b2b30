//! Error types for table transforms.

use thiserror::Error;

/// Errors raised while transforming tables.
#[derive(Debug, Error)]
pub enum TransformError {
    /// No normalised climate factor for a sector and zone.
    #[error("no climate factor for sector '{sector}' in zone '{zone}'")]
    MissingFactor { sector: String, zone: String },

    /// A sector's mean EUI is zero, so zone EUIs cannot be normalised.
    #[error("sector '{sector}' has zero mean EUI")]
    ZeroSectorMean { sector: String },

    /// More market sectors than index letters.
    #[error("{count} market sectors exceed the 26 available index letters")]
    TooManySectors { count: usize },

    /// A metric the transform needs is absent.
    #[error("metric '{metric}' not found")]
    MissingMetric { metric: String },

    /// Domain rule violation.
    #[error(transparent)]
    Model(#[from] eui_model::ModelError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
