//! Error types for region construction and persistence.

use thiserror::Error;

/// Errors raised while configuring, building or persisting a travel region model.
///
/// Lookups of unknown region or node ids are not errors: they return `None`
/// or an empty collection.
#[derive(Error, Debug)]
pub enum TravelRegionsError {
    /// Hierarchical level outside the supported range.
    #[error("Invalid hierarchical level {level}: expected 1..={max}")]
    InvalidLevel { level: usize, max: u8 },

    /// Missing or contradictory construction parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed input data (rows, bounding areas, region files).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Geometry that cannot be used (empty, zero-area, non-finite).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Country code unknown to both the catalog and the override table.
    #[error("Unknown country code: {0}")]
    UnknownCountry(String),

    /// A build was cancelled through its cancel token.
    #[error("Build cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for travel region operations.
pub type Result<T> = std::result::Result<T, TravelRegionsError>;
