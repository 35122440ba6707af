//! Embedding Store
//!
//! Immutable word -> vector lookup over one loaded table.

use std::fmt;

use hashbrown::HashMap;

use super::similarity::{cosine_similarity, magnitude};
use crate::loader::{EmbeddingSource, EmbeddingTable};

/// Why a similarity could not be computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingReason {
    /// The word has no vector in the store
    UnknownWord(String),
    /// The word's vector has zero magnitude
    ZeroVector(String),
    /// The word's vector magnitude overflows or is not a number
    NonFinite(String),
}

impl MissingReason {
    /// The word that caused the miss
    pub fn word(&self) -> &str {
        match self {
            MissingReason::UnknownWord(w)
            | MissingReason::ZeroVector(w)
            | MissingReason::NonFinite(w) => w,
        }
    }
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReason::UnknownWord(w) => write!(f, "no vector for '{}'", w),
            MissingReason::ZeroVector(w) => write!(f, "zero vector for '{}'", w),
            MissingReason::NonFinite(w) => write!(f, "non-finite vector for '{}'", w),
        }
    }
}

/// Result of a pairwise similarity query
#[derive(Debug, Clone, PartialEq)]
pub enum Similarity {
    Value(f32),
    Missing(MissingReason),
}

impl Similarity {
    pub fn value(&self) -> Option<f32> {
        match self {
            Similarity::Value(v) => Some(*v),
            Similarity::Missing(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Similarity::Missing(_))
    }
}

/// Word embeddings for one source, built once and read-only afterwards
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    source: EmbeddingSource,
    table: EmbeddingTable,
    /// Normalized label -> row in `table`
    index: HashMap<String, usize>,
}

impl EmbeddingStore {
    /// Index a loaded table. Later rows win over earlier rows with the same key.
    pub fn new(source: EmbeddingSource, table: EmbeddingTable) -> Self {
        let mut index = HashMap::with_capacity(table.len());
        for (row, label) in table.labels().iter().enumerate() {
            index.insert(Self::key(source, label), row);
        }
        Self {
            source,
            table,
            index,
        }
    }

    fn key(source: EmbeddingSource, word: &str) -> String {
        if source.is_case_insensitive() {
            word.to_lowercase()
        } else {
            word.to_string()
        }
    }

    pub fn source(&self) -> EmbeddingSource {
        self.source
    }

    pub fn dimension(&self) -> usize {
        self.table.dimension()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get the vector for `word`, `None` when absent
    pub fn lookup(&self, word: &str) -> Option<&[f32]> {
        let row = if self.source.is_case_insensitive() {
            *self.index.get(word.to_lowercase().as_str())?
        } else {
            *self.index.get(word)?
        };
        Some(self.table.row(row))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    /// Cosine similarity between two words
    pub fn cosine_similarity(&self, w1: &str, w2: &str) -> Similarity {
        let Some(v1) = self.lookup(w1) else {
            return Similarity::Missing(MissingReason::UnknownWord(w1.to_string()));
        };
        let Some(v2) = self.lookup(w2) else {
            return Similarity::Missing(MissingReason::UnknownWord(w2.to_string()));
        };
        assert_eq!(
            v1.len(),
            v2.len(),
            "dimension mismatch between '{}' and '{}'",
            w1,
            w2
        );

        match cosine_similarity(v1, v2) {
            Some(sim) => Similarity::Value(sim),
            None => {
                let reason = degenerate(w1, v1)
                    .or_else(|| degenerate(w2, v2))
                    .unwrap_or_else(|| MissingReason::NonFinite(w1.to_string()));
                Similarity::Missing(reason)
            }
        }
    }
}

/// Why `v` cannot take part in a cosine, if it cannot
fn degenerate(word: &str, v: &[f32]) -> Option<MissingReason> {
    let mag = magnitude(v);
    if !mag.is_finite() {
        Some(MissingReason::NonFinite(word.to_string()))
    } else if mag == 0.0 {
        Some(MissingReason::ZeroVector(word.to_string()))
    } else {
        None
    }
}
