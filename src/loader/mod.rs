//! Loader Module
//!
//! Streaming readers and per-format loaders for embedding files.

mod reader;
mod source;
mod table;

pub use reader::{RawRecord, TextEncoding, VectorReader, PROGRESS_EVERY};
pub use source::EmbeddingSource;
pub use table::EmbeddingTable;
