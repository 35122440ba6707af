//! Vector Module
//!
//! Embedding lookup, cosine similarity and similarity matrices.

mod embedding_store;
mod matrix;
mod similarity;

pub use embedding_store::{EmbeddingStore, MissingReason, Similarity};
pub use matrix::SimilarityMatrix;
pub use similarity::{cosine_similarity, dot_product, magnitude};
