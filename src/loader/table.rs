//! Embedding Table
//!
//! Labels plus one contiguous row-major block of coefficients.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// All accepted rows of one vector file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingTable {
    labels: Vec<String>,
    data: Vec<f32>,
    dimension: usize,
    path: PathBuf,
}

impl EmbeddingTable {
    /// Create an empty table; `path` is only used in diagnostics
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Append one row. The first row fixes the dimension.
    pub fn push(&mut self, line: usize, label: String, vector: &[f32]) -> Result<()> {
        if self.labels.is_empty() {
            self.dimension = vector.len();
        } else if vector.len() != self.dimension {
            return Err(Error::DimensionMismatch {
                path: self.path.clone(),
                line,
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        self.labels.push(label);
        self.data.extend_from_slice(vector);
        Ok(())
    }

    /// Vector length shared by every row (0 when empty)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Row `index` of the block
    pub fn row(&self, index: usize) -> &[f32] {
        let start = index * self.dimension;
        &self.data[start..start + self.dimension]
    }

    /// The whole `len x dimension` block
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Iterate `(label, vector)` in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(move |(i, label)| (label.as_str(), self.row(i)))
    }

    /// Release unused capacity once loading is complete
    pub fn shrink_to_fit(&mut self) {
        self.labels.shrink_to_fit();
        self.data.shrink_to_fit();
    }
}
