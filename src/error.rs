//! Error Types
//!
//! Load-time failures are fatal for the embedding source being processed.
//! Missing words are not errors; see [`crate::vector::Similarity`].

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Library error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown embedding source identifier.
    #[error("unsupported embedding source '{0}', expected one of: word2vec, GloVe, ConceptNet")]
    UnsupportedSource(String),

    /// I/O failure on a vector, word-list or output file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Non-numeric coefficient or undecodable line in a vector file.
    #[error("parse error in {} line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A row whose dimensionality differs from the rest of the table.
    #[error("dimension mismatch in {} line {line}: expected {expected}, got {actual}", path.display())]
    DimensionMismatch {
        path: PathBuf,
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// Invalid configuration or word-list file.
    #[error("config error: {0}")]
    Config(String),

    /// CSV output error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
