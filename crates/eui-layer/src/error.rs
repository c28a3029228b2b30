//! Error types for polygon layers.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading, joining or writing layers.
#[derive(Debug, Error)]
pub enum LayerError {
    // === File Errors ===
    /// Failed to read or write a shapefile component.
    #[error("shapefile error in {path}: {message}")]
    Shapefile { path: PathBuf, message: String },

    /// Plain I/O failure.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Projection definition that cannot be normalised to WGS84.
    #[error("unsupported coordinate reference system in {path}: {detail}")]
    UnsupportedCrs { path: PathBuf, detail: String },

    // === Attribute Errors ===
    /// Attribute required by a join is absent from the layer.
    #[error("layer has no field '{field}'")]
    MissingField { field: String },

    /// Field name that cannot be written to a DBF table.
    #[error("invalid DBF field name '{name}'")]
    InvalidFieldName { name: String },

    /// Attribute value that cannot be interpreted.
    #[error("invalid {field} value '{value}'")]
    InvalidValue { field: String, value: String },

    /// Replacement row whose length does not match the target columns.
    #[error("expected {expected} values for {target}, found {actual}")]
    LengthMismatch {
        target: String,
        expected: usize,
        actual: usize,
    },

    // === Domain Errors ===
    #[error(transparent)]
    Model(#[from] eui_model::ModelError),

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for LayerError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for layer operations.
pub type Result<T> = std::result::Result<T, LayerError>;
