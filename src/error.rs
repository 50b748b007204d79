//! Error types for vitrina.
//!
//! Only the ingestion boundary and configuration loading return errors.
//! View operations clamp or ignore out-of-range requests instead.

/// Result type alias for vitrina operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vitrina operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Arrow error while reading decoded batches.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON error while reading a configuration document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Requested page lies outside `[1, total_pages]`.
    #[error("Page {page} out of range (total pages: {total_pages})")]
    PageOutOfRange {
        /// The requested page (1-based).
        page: usize,
        /// The number of pages available.
        total_pages: usize,
    },

    /// Requested ranking size is not usable.
    #[error("Invalid rank size {requested} (allowed: 1..={max})")]
    InvalidRankSize {
        /// The requested size.
        requested: usize,
        /// The largest accepted size.
        max: usize,
    },

    /// Column not found in a decoded batch schema.
    #[error("Column '{name}' not found in schema")]
    ColumnNotFound {
        /// The name of the missing column.
        name: String,
    },

    /// A column exists but carries a type that cannot be mapped.
    #[error("Schema mismatch: {message}")]
    SchemaMismatch {
        /// Description of the schema mismatch.
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// A field identifier did not name any known column.
    #[error("Unknown field: {name}")]
    UnknownField {
        /// The unrecognised identifier.
        name: String,
    },
}

impl Error {
    /// Create a column not found error.
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    /// Create a schema mismatch error.
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unknown field error.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }
}
