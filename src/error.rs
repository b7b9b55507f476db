//! Error types.
//!
//! The query path never fails: out-of-grid cells read as empty, zero
//! displacements are no-ops. Errors only arise while building values from
//! untrusted input (level data, config files, numeric enumerants).

use thiserror::Error;

/// Geometry construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Origin position enumerant outside `0..=8`.
    #[error("unknown origin position: {0}")]
    UnknownOriginPosition(u8),
}

/// Tile grid construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// Cell buffer length does not match `rows * cols`.
    #[error("grid data has {actual} cells, expected {rows}x{cols}")]
    DimensionMismatch {
        /// Declared row count
        rows: usize,
        /// Declared column count
        cols: usize,
        /// Buffer length received
        actual: usize,
    },

    /// Zero rows or columns.
    #[error("invalid grid dimensions {rows}x{cols}")]
    InvalidDimensions {
        /// Declared row count
        rows: usize,
        /// Declared column count
        cols: usize,
    },
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Well-formed but out-of-range values.
    #[error("invalid config: {0}")]
    Invalid(String),
}
