//! Error types for grid loading, decomposition and geometry synthesis.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or dimensionally inconsistent grid, or an empty tile grid.
    #[error("invalid grid: {0}")]
    Validation(String),

    /// An upper frame piece has no lower-grid piece under any of its border tiles.
    #[error("upper frame piece {upper_piece} ({tiles} border tiles) overlaps no lower frame piece")]
    UnmatchedFrame {
        /// The upper piece ID that found no partner.
        upper_piece: usize,
        /// Number of border tiles the piece was checked at.
        tiles: usize,
    },

    /// The modeling layer rejected a primitive.
    #[error("cannot emit geometry: {0}")]
    GeometryEmission(String),

    /// I/O error while reading or writing a file.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A grid could not be serialized to JSON.
    #[error("cannot serialize grid: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
