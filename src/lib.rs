//! wordsim - Word Embedding Similarity Matrices
//!
//! Loads word2vec, GloVe and ConceptNet vector tables into one uniform
//! lookup store and computes pairwise cosine-similarity matrices for
//! fixed word lists.

pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod pipeline;
pub mod vector;

pub use config::{Config, WordList};
pub use error::{Error, Result};
pub use loader::{EmbeddingSource, EmbeddingTable, TextEncoding, VectorReader};
pub use metrics::Metrics;
pub use pipeline::{run, RunSummary};
pub use vector::{EmbeddingStore, MissingReason, Similarity, SimilarityMatrix};
